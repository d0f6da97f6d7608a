// src/stats.rs

use crate::db::{with_connection, Database};
use crate::error::AppError;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Read-side aggregates over a habit's progress history.
#[derive(Debug, Clone, Serialize)]
pub struct HabitStats {
    pub longest_streak: i64,
    /// Share of recorded days that were completed, 0.0 - 100.0.
    pub completion_rate: f64,
    pub average_progress: f64,
}

pub fn habit_stats(
    db: &Arc<Mutex<Database>>,
    user_email: &str,
    habit_name: &str,
) -> Result<HabitStats, AppError> {
    with_connection(db, "load habit statistics", |conn| {
        Ok(HabitStats {
            longest_streak: longest_streak(conn, user_email, habit_name)?,
            completion_rate: completion_rate(conn, user_email, habit_name)?,
            average_progress: average_progress(conn, user_email, habit_name)?,
        })
    })
}

fn longest_streak(conn: &Connection, user_email: &str, habit_name: &str) -> rusqlite::Result<i64> {
    let max: Option<i64> = conn.query_row(
        "SELECT MAX(streak) FROM habit_progress WHERE user_email = ?1 AND habit_name = ?2",
        params![user_email, habit_name],
        |row| row.get(0),
    )?;
    Ok(max.unwrap_or(0))
}

fn completion_rate(conn: &Connection, user_email: &str, habit_name: &str) -> rusqlite::Result<f64> {
    let rate: Option<f64> = conn.query_row(
        "SELECT AVG(completed) * 100.0 FROM habit_progress WHERE user_email = ?1 AND habit_name = ?2",
        params![user_email, habit_name],
        |row| row.get(0),
    )?;
    Ok(rate.unwrap_or(0.0))
}

fn average_progress(conn: &Connection, user_email: &str, habit_name: &str) -> rusqlite::Result<f64> {
    let avg: Option<f64> = conn.query_row(
        "SELECT AVG(progress) FROM habit_progress WHERE user_email = ?1 AND habit_name = ?2",
        params![user_email, habit_name],
        |row| row.get(0),
    )?;
    Ok(avg.unwrap_or(0.0))
}
