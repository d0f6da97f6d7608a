use crate::dates::{parse_weekday, weekday_name};
use chrono::Weekday;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Result};

/// The every-N-days rule for an interval habit. One row per habit.
#[derive(Debug, Clone)]
pub struct IntervalRule {
    pub user_email: String,
    pub habit_name: String,
    pub increment_days: i64,
}

impl IntervalRule {
    /// Replace the habit's interval rule. Delete-then-insert keeps exactly
    /// one row per habit.
    pub fn replace(
        conn: &Connection,
        user_email: &str,
        habit_name: &str,
        increment_days: i64,
    ) -> Result<()> {
        conn.execute(
            "DELETE FROM habit_intervals WHERE user_email = ?1 AND habit_name = ?2",
            params![user_email, habit_name],
        )?;
        conn.execute(
            "INSERT INTO habit_intervals (user_email, habit_name, increment_days) VALUES (?1, ?2, ?3)",
            params![user_email, habit_name, increment_days],
        )?;
        Ok(())
    }

    pub fn find(conn: &Connection, user_email: &str, habit_name: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT user_email, habit_name, increment_days
             FROM habit_intervals WHERE user_email = ?1 AND habit_name = ?2",
        )?;
        let mut rows = stmt.query(params![user_email, habit_name])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Self {
                user_email: row.get(0)?,
                habit_name: row.get(1)?,
                increment_days: row.get(2)?,
            }))
        } else {
            Ok(None)
        }
    }

    pub fn delete_for_habit(conn: &Connection, user_email: &str, habit_name: &str) -> Result<()> {
        conn.execute(
            "DELETE FROM habit_intervals WHERE user_email = ?1 AND habit_name = ?2",
            params![user_email, habit_name],
        )?;
        Ok(())
    }
}

/// The selected-weekdays rule for a weekly habit: zero or more day rows,
/// stored as full English day names.
pub struct WeeklyRule;

impl WeeklyRule {
    /// Replace the habit's weekday set. Duplicate day names collapse via the
    /// primary key.
    pub fn replace(
        conn: &Connection,
        user_email: &str,
        habit_name: &str,
        days: &[Weekday],
    ) -> Result<()> {
        conn.execute(
            "DELETE FROM habit_days WHERE user_email = ?1 AND habit_name = ?2",
            params![user_email, habit_name],
        )?;
        for day in days {
            conn.execute(
                "INSERT OR IGNORE INTO habit_days (user_email, habit_name, weekday) VALUES (?1, ?2, ?3)",
                params![user_email, habit_name, weekday_name(*day)],
            )?;
        }
        Ok(())
    }

    pub fn days(conn: &Connection, user_email: &str, habit_name: &str) -> Result<Vec<Weekday>> {
        let mut stmt = conn.prepare(
            "SELECT weekday FROM habit_days WHERE user_email = ?1 AND habit_name = ?2",
        )?;

        let rows = stmt.query_map(params![user_email, habit_name], |row| {
            let name: String = row.get(0)?;
            parse_weekday(&name).map_err(|_| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    Type::Text,
                    format!("unrecognized weekday '{}'", name).into(),
                )
            })
        })?;
        rows.collect()
    }

    pub fn delete_for_habit(conn: &Connection, user_email: &str, habit_name: &str) -> Result<()> {
        conn.execute(
            "DELETE FROM habit_days WHERE user_email = ?1 AND habit_name = ?2",
            params![user_email, habit_name],
        )?;
        Ok(())
    }
}
