//! Forward projection of due instances from a habit's recurrence rule.

use crate::dates::{interval_dates, weekly_dates};
use crate::models::{Habit, Instance, IntervalRule, Recurrence, WeeklyRule};
use chrono::{Duration, NaiveDate};
use rusqlite::{Connection, Result};

/// Project due instances for an interval habit up to `today + days_ahead`.
///
/// Picks up where the schedule left off: the latest already-scheduled due
/// date seeds the sequence, defaulting to `today` when nothing is scheduled
/// yet. A habit that is not interval-recurring, or has no increment
/// configured, is nothing to do rather than an error. Returns the number of
/// instances inserted; re-running without time elapsing inserts none.
pub fn generate_interval_instances(
    conn: &Connection,
    user_email: &str,
    habit_name: &str,
    today: NaiveDate,
    days_ahead: i64,
) -> Result<usize> {
    match Habit::find(conn, user_email, habit_name)? {
        Some(habit) if habit.recurrence == Recurrence::Interval => {}
        _ => return Ok(0),
    }
    let rule = match IntervalRule::find(conn, user_email, habit_name)? {
        Some(rule) => rule,
        None => return Ok(0),
    };

    let last = Instance::last_due_date(conn, user_email, habit_name)?.unwrap_or(today);
    let cutoff = today + Duration::days(days_ahead);

    let mut inserted = 0;
    for date in interval_dates(last, cutoff, rule.increment_days) {
        if Instance::insert_if_absent(conn, user_email, habit_name, date)? {
            inserted += 1;
        }
    }
    Ok(inserted)
}

/// Project due instances for a weekly habit over `[today, today + days_ahead]`.
///
/// A habit with no selected weekdays is nothing to do. Returns the number of
/// instances inserted.
pub fn generate_day_instances(
    conn: &Connection,
    user_email: &str,
    habit_name: &str,
    today: NaiveDate,
    days_ahead: i64,
) -> Result<usize> {
    let days = WeeklyRule::days(conn, user_email, habit_name)?;
    if days.is_empty() {
        return Ok(0);
    }

    let cutoff = today + Duration::days(days_ahead);

    let mut inserted = 0;
    for date in weekly_dates(today, cutoff, &days) {
        if Instance::insert_if_absent(conn, user_email, habit_name, date)? {
            inserted += 1;
        }
    }
    Ok(inserted)
}
