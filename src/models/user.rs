use chrono::Utc;
use rusqlite::{params, Connection, Result};

/// An account row. Authentication lives in the calling layer; this is only
/// the ownership anchor for habits and their dependent rows.
#[derive(Debug, Clone)]
pub struct User {
    pub email: String,
    pub created_at: i64,
}

impl User {
    pub fn create(conn: &Connection, email: &str) -> Result<Self> {
        let user = Self {
            email: email.to_string(),
            created_at: Utc::now().timestamp(),
        };
        conn.execute(
            "INSERT INTO users (email, created_at) VALUES (?1, ?2)",
            params![user.email, user.created_at],
        )?;
        Ok(user)
    }

    pub fn find(conn: &Connection, email: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare("SELECT email, created_at FROM users WHERE email = ?1")?;
        let mut rows = stmt.query(params![email])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Self {
                email: row.get(0)?,
                created_at: row.get(1)?,
            }))
        } else {
            Ok(None)
        }
    }

    /// Delete an account and everything it owns, all-or-nothing.
    ///
    /// Returns false if no such user existed. This is the only multi-step
    /// write that runs inside an explicit transaction: a partially deleted
    /// account must never be observable.
    pub fn delete_account(conn: &Connection, email: &str) -> Result<bool> {
        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM habit_progress WHERE user_email = ?1", params![email])?;
        tx.execute("DELETE FROM habit_instances WHERE user_email = ?1", params![email])?;
        tx.execute("DELETE FROM habit_days WHERE user_email = ?1", params![email])?;
        tx.execute("DELETE FROM habit_intervals WHERE user_email = ?1", params![email])?;
        tx.execute("DELETE FROM habits WHERE user_email = ?1", params![email])?;
        let rows = tx.execute("DELETE FROM users WHERE email = ?1", params![email])?;
        tx.commit()?;
        Ok(rows > 0)
    }
}
