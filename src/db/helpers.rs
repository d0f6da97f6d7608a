// src/db/helpers.rs

use crate::db::Database;
use crate::error::AppError;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Execute a database operation with proper lock handling and error mapping.
///
/// # Example
/// ```ignore
/// with_connection(&db, "load habits", |conn| {
///     Habit::find_all_for_user(conn, "ada@example.com")
/// })
/// ```
pub fn with_connection<F, T>(
    db: &Arc<Mutex<Database>>,
    operation: &str,
    f: F,
) -> Result<T, AppError>
where
    F: FnOnce(&Connection) -> rusqlite::Result<T>,
{
    let db = db.lock().map_err(|e| {
        log::error!("Failed to acquire database lock for {}: {}", operation, e);
        AppError::LockPoisoned
    })?;

    f(db.connection()).map_err(|e| {
        log::error!("Failed to {}: {}", operation, e);
        AppError::Database(e)
    })
}
