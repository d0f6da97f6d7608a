use crate::dates::{format_date, parse_date};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Result};

/// A projected future due occurrence of a habit, not yet realized into a
/// progress row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub user_email: String,
    pub habit_name: String,
    pub due_date: NaiveDate,
}

/// Whitelisted comparison operators for due-date scans. The operator never
/// comes from caller strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCondition {
    /// Due exactly on the given date.
    On,
    /// Due on or before the given date (overdue included).
    OnOrBefore,
}

impl DateCondition {
    fn sql_op(self) -> &'static str {
        match self {
            DateCondition::On => "=",
            DateCondition::OnOrBefore => "<=",
        }
    }
}

impl Instance {
    /// Insert an instance unless one already exists for this habit and date.
    /// Returns true if a row was actually inserted.
    pub fn insert_if_absent(
        conn: &Connection,
        user_email: &str,
        habit_name: &str,
        due_date: NaiveDate,
    ) -> Result<bool> {
        let rows = conn.execute(
            "INSERT OR IGNORE INTO habit_instances (user_email, habit_name, due_date) VALUES (?1, ?2, ?3)",
            params![user_email, habit_name, format_date(due_date)],
        )?;
        Ok(rows > 0)
    }

    /// Latest due date already scheduled for the habit, if any.
    pub fn last_due_date(
        conn: &Connection,
        user_email: &str,
        habit_name: &str,
    ) -> Result<Option<NaiveDate>> {
        let max: Option<String> = conn.query_row(
            "SELECT MAX(due_date) FROM habit_instances WHERE user_email = ?1 AND habit_name = ?2",
            params![user_email, habit_name],
            |row| row.get(0),
        )?;

        match max {
            Some(text) => parse_date(&text)
                .map(Some)
                .map_err(|_| date_conversion_error(&text)),
            None => Ok(None),
        }
    }

    /// All of a user's instances whose due date satisfies the condition,
    /// oldest first.
    pub fn find_due(
        conn: &Connection,
        user_email: &str,
        condition: DateCondition,
        date: NaiveDate,
    ) -> Result<Vec<Self>> {
        let sql = format!(
            "SELECT user_email, habit_name, due_date FROM habit_instances
             WHERE user_email = ?1 AND due_date {} ?2 ORDER BY due_date",
            condition.sql_op()
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map(params![user_email, format_date(date)], |row| {
            let due_text: String = row.get(2)?;
            let due_date = parse_date(&due_text).map_err(|_| date_conversion_error(&due_text))?;
            Ok(Self {
                user_email: row.get(0)?,
                habit_name: row.get(1)?,
                due_date,
            })
        })?;
        rows.collect()
    }

    pub fn delete(
        conn: &Connection,
        user_email: &str,
        habit_name: &str,
        due_date: NaiveDate,
    ) -> Result<bool> {
        let rows = conn.execute(
            "DELETE FROM habit_instances WHERE user_email = ?1 AND habit_name = ?2 AND due_date = ?3",
            params![user_email, habit_name, format_date(due_date)],
        )?;
        Ok(rows > 0)
    }
}

fn date_conversion_error(text: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        2,
        Type::Text,
        format!("'{}' is not a YYYY-MM-DD date", text).into(),
    )
}
