//! Recording a user's progress value against today's entry.

use crate::error::AppError;
use crate::models::{Habit, Progress};
use chrono::NaiveDate;
use rusqlite::Connection;

/// Record a progress value on the habit's entry for `today`.
///
/// The entry must already exist (the migrator or filler creates it before
/// the user can log against it); a missing entry is a `NotFound`, distinct
/// from a store error. Completion is judged against the habit's goal, and
/// the running streak is recomputed from the most recent prior entry:
/// `prior.streak + 1` when that entry exists and was completed, `1` for a
/// fresh start, and `0` the moment a day is not completed.
pub fn record_progress(
    conn: &Connection,
    user_email: &str,
    habit_name: &str,
    value: f64,
    today: NaiveDate,
) -> Result<Progress, AppError> {
    let habit = Habit::find(conn, user_email, habit_name)?
        .ok_or(AppError::NotFound { entity: "Habit" })?;
    let mut entry = Progress::find(conn, user_email, habit_name, today)?
        .ok_or(AppError::NotFound { entity: "Progress entry" })?;

    let completed = habit.is_goal_met(value);
    let streak = if completed {
        match Progress::latest_before(conn, user_email, habit_name, today)? {
            Some(prior) if prior.completed => prior.streak + 1,
            _ => 1,
        }
    } else {
        0
    };

    Progress::update_entry(conn, user_email, habit_name, today, value, completed, streak)?;

    entry.progress = value;
    entry.completed = completed;
    entry.streak = streak;
    Ok(entry)
}
