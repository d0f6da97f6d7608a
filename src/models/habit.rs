use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Result, Row};

/// Whether the habit builds a behavior or quits one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitKind {
    Build,
    Quit,
}

impl HabitKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HabitKind::Build => "build",
            HabitKind::Quit => "quit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "build" => Some(HabitKind::Build),
            "quit" => Some(HabitKind::Quit),
            _ => None,
        }
    }
}

/// How the habit recurs: every N days, or on selected weekdays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    Interval,
    Weekly,
}

impl Recurrence {
    pub fn as_str(self) -> &'static str {
        match self {
            Recurrence::Interval => "interval",
            Recurrence::Weekly => "weekly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "interval" => Some(Recurrence::Interval),
            "weekly" => Some(Recurrence::Weekly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Habit {
    pub user_email: String,
    pub name: String,
    pub description: String,
    pub kind: HabitKind,
    pub color: String,
    pub recurrence: Recurrence,
    pub goal_value: Option<f64>,
    pub goal_unit: Option<String>,
    pub created_at: i64,
}

impl Habit {
    /// Create a new habit (not yet saved to the database).
    pub fn new(user_email: &str, name: &str, recurrence: Recurrence) -> Self {
        Self {
            user_email: user_email.to_string(),
            name: name.to_string(),
            description: String::new(),
            kind: HabitKind::Build,
            color: "#4caf50".to_string(),
            recurrence,
            goal_value: None,
            goal_unit: None,
            created_at: Utc::now().timestamp(),
        }
    }

    pub fn save(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO habits (user_email, name, description, kind, color, recurrence, goal_value, goal_unit, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                self.user_email,
                self.name,
                self.description,
                self.kind.as_str(),
                self.color,
                self.recurrence.as_str(),
                self.goal_value,
                self.goal_unit,
                self.created_at,
            ],
        )?;
        Ok(())
    }

    /// Update the mutable attributes of an existing habit.
    pub fn update(&self, conn: &Connection) -> Result<bool> {
        let rows = conn.execute(
            "UPDATE habits
             SET description = ?1, kind = ?2, color = ?3, recurrence = ?4,
                 goal_value = ?5, goal_unit = ?6
             WHERE user_email = ?7 AND name = ?8",
            params![
                self.description,
                self.kind.as_str(),
                self.color,
                self.recurrence.as_str(),
                self.goal_value,
                self.goal_unit,
                self.user_email,
                self.name,
            ],
        )?;
        Ok(rows > 0)
    }

    pub fn find(conn: &Connection, user_email: &str, name: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT user_email, name, description, kind, color, recurrence, goal_value, goal_unit, created_at
             FROM habits WHERE user_email = ?1 AND name = ?2",
        )?;
        let mut rows = stmt.query(params![user_email, name])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Self::from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn find_all_for_user(conn: &Connection, user_email: &str) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT user_email, name, description, kind, color, recurrence, goal_value, goal_unit, created_at
             FROM habits WHERE user_email = ?1 ORDER BY name",
        )?;

        let rows = stmt.query_map(params![user_email], |row| Self::from_row(row))?;
        rows.collect()
    }

    /// Delete a habit; rules, instances, and progress go with it via the
    /// cascading foreign keys.
    pub fn delete(conn: &Connection, user_email: &str, name: &str) -> Result<bool> {
        let rows = conn.execute(
            "DELETE FROM habits WHERE user_email = ?1 AND name = ?2",
            params![user_email, name],
        )?;
        Ok(rows > 0)
    }

    /// The completion threshold: the configured goal, or 1 when no goal set.
    pub fn is_goal_met(&self, value: f64) -> bool {
        value >= self.goal_value.unwrap_or(1.0)
    }

    fn from_row(row: &Row) -> Result<Self> {
        let kind_text: String = row.get(3)?;
        let kind = HabitKind::parse(&kind_text).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                Type::Text,
                format!("unrecognized habit kind '{}'", kind_text).into(),
            )
        })?;

        let recurrence_text: String = row.get(5)?;
        let recurrence = Recurrence::parse(&recurrence_text).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                Type::Text,
                format!("unrecognized recurrence '{}'", recurrence_text).into(),
            )
        })?;

        Ok(Self {
            user_email: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            kind,
            color: row.get(4)?,
            recurrence,
            goal_value: row.get(6)?,
            goal_unit: row.get(7)?,
            created_at: row.get(8)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Instance, IntervalRule, Progress, User};
    use crate::test_utils::setup_test_db;
    use chrono::NaiveDate;
    use rusqlite::Connection;

    fn seed_user(conn: &Connection) {
        User::create(conn, "ada@example.com").unwrap();
    }

    #[test]
    fn test_save_and_find_round_trip() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_user(conn);

        let mut habit = Habit::new("ada@example.com", "Run", Recurrence::Interval);
        habit.description = "Morning run".to_string();
        habit.kind = HabitKind::Build;
        habit.goal_value = Some(5.0);
        habit.goal_unit = Some("km".to_string());
        habit.save(conn).unwrap();

        let found = Habit::find(conn, "ada@example.com", "Run").unwrap().unwrap();
        assert_eq!(found.description, "Morning run");
        assert_eq!(found.kind, HabitKind::Build);
        assert_eq!(found.recurrence, Recurrence::Interval);
        assert_eq!(found.goal_value, Some(5.0));
        assert_eq!(found.goal_unit.as_deref(), Some("km"));
    }

    #[test]
    fn test_find_returns_none_for_missing_habit() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_user(conn);

        assert!(Habit::find(conn, "ada@example.com", "Ghost").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_name_per_user_rejected() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_user(conn);

        Habit::new("ada@example.com", "Run", Recurrence::Interval)
            .save(conn)
            .unwrap();
        let result = Habit::new("ada@example.com", "Run", Recurrence::Weekly).save(conn);
        assert!(result.is_err());
        assert!(crate::error::is_unique_violation(&result.unwrap_err()));
    }

    #[test]
    fn test_same_name_for_different_users_allowed() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_user(conn);
        User::create(conn, "bob@example.com").unwrap();

        Habit::new("ada@example.com", "Run", Recurrence::Interval)
            .save(conn)
            .unwrap();
        Habit::new("bob@example.com", "Run", Recurrence::Weekly)
            .save(conn)
            .unwrap();

        assert_eq!(Habit::find_all_for_user(conn, "ada@example.com").unwrap().len(), 1);
        assert_eq!(Habit::find_all_for_user(conn, "bob@example.com").unwrap().len(), 1);
    }

    #[test]
    fn test_update_changes_attributes() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_user(conn);

        let mut habit = Habit::new("ada@example.com", "Soda", Recurrence::Interval);
        habit.save(conn).unwrap();

        habit.kind = HabitKind::Quit;
        habit.color = "#f44336".to_string();
        habit.goal_value = Some(0.0);
        assert!(habit.update(conn).unwrap());

        let found = Habit::find(conn, "ada@example.com", "Soda").unwrap().unwrap();
        assert_eq!(found.kind, HabitKind::Quit);
        assert_eq!(found.color, "#f44336");
        assert_eq!(found.goal_value, Some(0.0));
    }

    #[test]
    fn test_update_missing_habit_returns_false() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_user(conn);

        let habit = Habit::new("ada@example.com", "Ghost", Recurrence::Interval);
        assert!(!habit.update(conn).unwrap());
    }

    #[test]
    fn test_delete_cascades_to_dependents() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_user(conn);
        let date = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();

        Habit::new("ada@example.com", "Run", Recurrence::Interval)
            .save(conn)
            .unwrap();
        IntervalRule::replace(conn, "ada@example.com", "Run", 2).unwrap();
        Instance::insert_if_absent(conn, "ada@example.com", "Run", date).unwrap();
        Progress::insert_placeholder_if_absent(conn, "ada@example.com", "Run", date).unwrap();

        assert!(Habit::delete(conn, "ada@example.com", "Run").unwrap());

        for table in ["habit_intervals", "habit_instances", "habit_progress"] {
            let count: i32 = conn
                .query_row(
                    &format!("SELECT COUNT(*) FROM {} WHERE habit_name = 'Run'", table),
                    [],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 0, "{} rows should cascade away", table);
        }
    }

    #[test]
    fn test_find_all_orders_by_name() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_user(conn);

        for name in ["Stretch", "Run", "Meditate"] {
            Habit::new("ada@example.com", name, Recurrence::Interval)
                .save(conn)
                .unwrap();
        }

        let habits = Habit::find_all_for_user(conn, "ada@example.com").unwrap();
        let names: Vec<&str> = habits.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Meditate", "Run", "Stretch"]);
    }

    #[test]
    fn test_unrecognized_recurrence_text_fails_to_load() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_user(conn);

        conn.execute(
            "INSERT INTO habits (user_email, name, description, kind, color, recurrence, created_at)
             VALUES ('ada@example.com', 'Broken', '', 'build', '#fff', 'fortnightly', 0)",
            [],
        )
        .unwrap();

        let result = Habit::find_all_for_user(conn, "ada@example.com");
        assert!(matches!(
            result,
            Err(rusqlite::Error::FromSqlConversionFailure(5, _, _))
        ));
    }

    #[test]
    fn test_is_goal_met_defaults_to_one() {
        let mut habit = Habit::new("ada@example.com", "Run", Recurrence::Interval);
        assert!(!habit.is_goal_met(0.0));
        assert!(habit.is_goal_met(1.0));

        habit.goal_value = Some(5.0);
        assert!(!habit.is_goal_met(4.9));
        assert!(habit.is_goal_met(5.0));
    }
}
