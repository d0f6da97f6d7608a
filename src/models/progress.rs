use crate::dates::{format_date, parse_date};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Result, Row};
use serde::Serialize;

/// The realized daily record of a habit's outcome for one calendar day.
/// `streak` counts consecutive completed days ending at this date, 0 when
/// broken.
#[derive(Debug, Clone, Serialize)]
pub struct Progress {
    pub user_email: String,
    pub habit_name: String,
    pub progress_date: NaiveDate,
    pub progress: f64,
    pub completed: bool,
    pub streak: i64,
}

impl Progress {
    /// Insert a zero-progress placeholder row unless one already exists for
    /// this habit and date. Existing rows are never touched. Returns true if
    /// a row was actually inserted.
    pub fn insert_placeholder_if_absent(
        conn: &Connection,
        user_email: &str,
        habit_name: &str,
        date: NaiveDate,
    ) -> Result<bool> {
        let rows = conn.execute(
            "INSERT OR IGNORE INTO habit_progress
             (user_email, habit_name, progress_date, progress, completed, streak)
             VALUES (?1, ?2, ?3, 0, 0, 0)",
            params![user_email, habit_name, format_date(date)],
        )?;
        Ok(rows > 0)
    }

    pub fn find(
        conn: &Connection,
        user_email: &str,
        habit_name: &str,
        date: NaiveDate,
    ) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT user_email, habit_name, progress_date, progress, completed, streak
             FROM habit_progress
             WHERE user_email = ?1 AND habit_name = ?2 AND progress_date = ?3",
        )?;
        let mut rows = stmt.query(params![user_email, habit_name, format_date(date)])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Self::from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// Latest date with any progress row for the habit, if one exists.
    pub fn last_date(
        conn: &Connection,
        user_email: &str,
        habit_name: &str,
    ) -> Result<Option<NaiveDate>> {
        let max: Option<String> = conn.query_row(
            "SELECT MAX(progress_date) FROM habit_progress WHERE user_email = ?1 AND habit_name = ?2",
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

    /// The most recent progress row strictly before `date`: the streak
    /// predecessor.
    pub fn latest_before(
        conn: &Connection,
        user_email: &str,
        habit_name: &str,
        date: NaiveDate,
    ) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT user_email, habit_name, progress_date, progress, completed, streak
             FROM habit_progress
             WHERE user_email = ?1 AND habit_name = ?2 AND progress_date < ?3
             ORDER BY progress_date DESC LIMIT 1",
        )?;
        let mut rows = stmt.query(params![user_email, habit_name, format_date(date)])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Self::from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// Point update of an existing row's progress, completed, and streak.
    /// Returns false when no row exists for the date.
    pub fn update_entry(
        conn: &Connection,
        user_email: &str,
        habit_name: &str,
        date: NaiveDate,
        progress: f64,
        completed: bool,
        streak: i64,
    ) -> Result<bool> {
        let rows = conn.execute(
            "UPDATE habit_progress SET progress = ?1, completed = ?2, streak = ?3
             WHERE user_email = ?4 AND habit_name = ?5 AND progress_date = ?6",
            params![
                progress,
                completed as i32,
                streak,
                user_email,
                habit_name,
                format_date(date)
            ],
        )?;
        Ok(rows > 0)
    }

    pub fn find_all_for_habit(
        conn: &Connection,
        user_email: &str,
        habit_name: &str,
    ) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT user_email, habit_name, progress_date, progress, completed, streak
             FROM habit_progress
             WHERE user_email = ?1 AND habit_name = ?2 ORDER BY progress_date",
        )?;

        let rows = stmt.query_map(params![user_email, habit_name], |row| Self::from_row(row))?;
        rows.collect()
    }

    fn from_row(row: &Row) -> Result<Self> {
        let date_text: String = row.get(2)?;
        let progress_date = parse_date(&date_text).map_err(|_| date_conversion_error(&date_text))?;
        Ok(Self {
            user_email: row.get(0)?,
            habit_name: row.get(1)?,
            progress_date,
            progress: row.get(3)?,
            completed: row.get::<_, i32>(4)? != 0,
            streak: row.get(5)?,
        })
    }
}

fn date_conversion_error(text: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        2,
        Type::Text,
        format!("'{}' is not a YYYY-MM-DD date", text).into(),
    )
}
