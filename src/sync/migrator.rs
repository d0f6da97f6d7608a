//! Realization of due instances into dated progress placeholders.

use crate::models::{DateCondition, Instance, Progress};
use chrono::NaiveDate;
use log::warn;
use rusqlite::{Connection, Result};

/// Move every instance of `user_email` whose due date satisfies the
/// condition into a placeholder progress row, then delete the instance.
///
/// The progress insert happens before the instance delete, so an
/// interrupted run can only leave the instance behind to be migrated again
/// (at-least-once). The placeholder insert ignores duplicates, which makes a
/// second pass over the same range a no-op. A failure on one instance is
/// logged and skipped (the surviving row self-heals on the next sync); a
/// failure of the selection scan itself propagates.
///
/// Returns the number of instances migrated.
pub fn migrate_instances(
    conn: &Connection,
    user_email: &str,
    condition: DateCondition,
    date: NaiveDate,
) -> Result<usize> {
    let due = Instance::find_due(conn, user_email, condition, date)?;

    let mut migrated = 0;
    for instance in due {
        let result = Progress::insert_placeholder_if_absent(
            conn,
            &instance.user_email,
            &instance.habit_name,
            instance.due_date,
        )
        .and_then(|_| {
            Instance::delete(
                conn,
                &instance.user_email,
                &instance.habit_name,
                instance.due_date,
            )
        });

        match result {
            Ok(_) => migrated += 1,
            Err(e) => warn!(
                "failed to migrate instance '{}' due {}: {}",
                instance.habit_name, instance.due_date, e
            ),
        }
    }
    Ok(migrated)
}
