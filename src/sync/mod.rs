//! The habit synchronization engine.
//!
//! `SyncManager` is the entry point the calling layer uses on login and
//! after habit mutations. A sync run is a strict three-step protocol over
//! one locked connection, each step a precondition for the next:
//!
//! 1. migrate: realize every due or overdue instance into a progress
//!    placeholder (`migrator`);
//! 2. fill: reconstruct placeholders for scheduled days the migrator had
//!    no instance for (`filler`), now seeing the true last-progress date
//!    including just-migrated rows;
//! 3. generate: replenish the forward-looking instance horizon
//!    (`generator`), starting from an up-to-date last-scheduled baseline.
//!
//! The steps must not be reordered or interleaved.

pub mod filler;
pub mod generator;
pub mod migrator;
pub mod recorder;

use crate::constants::DEFAULT_HORIZON_DAYS;
use crate::dates;
use crate::db::Database;
use crate::error::AppError;
use crate::models::{DateCondition, Habit, Progress, Recurrence};
use crate::validation::validate_days_ahead;
use chrono::NaiveDate;
use log::{info, warn};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct SyncManager {
    db: Arc<Mutex<Database>>,
}

impl SyncManager {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    fn lock_db(&self) -> MutexGuard<'_, Database> {
        match self.db.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("SyncManager: database mutex was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Run the migrate → fill → generate protocol for one user.
    ///
    /// Migration and fill failures abort the run; generation is best-effort
    /// per habit, logged and skipped so one broken habit cannot starve the
    /// others. Habit rows that no longer parse are surfaced as
    /// `InvalidData` before any step runs.
    pub fn sync_habits(&self, user_email: &str) -> Result<(), AppError> {
        let db = self.lock_db();
        let conn = db.connection();
        let today = dates::today();

        let habits = habits_or_invalid(Habit::find_all_for_user(conn, user_email))?;

        let migrated =
            migrator::migrate_instances(conn, user_email, DateCondition::OnOrBefore, today)?;
        let filled = filler::fill_missed_progress(conn, user_email, today)?;

        let mut generated = 0;
        for habit in &habits {
            let result = match habit.recurrence {
                Recurrence::Interval => generator::generate_interval_instances(
                    conn,
                    user_email,
                    &habit.name,
                    today,
                    DEFAULT_HORIZON_DAYS,
                ),
                Recurrence::Weekly => generator::generate_day_instances(
                    conn,
                    user_email,
                    &habit.name,
                    today,
                    DEFAULT_HORIZON_DAYS,
                ),
            };
            match result {
                Ok(count) => generated += count,
                Err(e) => {
                    // Self-heals on the next sync; do not starve the other habits.
                    warn!("instance generation failed for '{}': {}", habit.name, e);
                }
            }
        }

        info!(
            "synced habits for {}: {} migrated, {} filled, {} generated",
            user_email, migrated, filled, generated
        );
        Ok(())
    }

    /// Project instances for one interval habit, `days_ahead` days out
    /// (default 7).
    pub fn generate_interval_instances(
        &self,
        user_email: &str,
        habit_name: &str,
        days_ahead: Option<i64>,
    ) -> Result<usize, AppError> {
        let horizon = days_ahead.unwrap_or(DEFAULT_HORIZON_DAYS);
        validate_days_ahead(horizon)?;
        let db = self.lock_db();
        let conn = db.connection();
        Ok(generator::generate_interval_instances(
            conn,
            user_email,
            habit_name,
            dates::today(),
            horizon,
        )?)
    }

    /// Project instances for one weekly habit, `days_ahead` days out
    /// (default 7).
    pub fn generate_day_instances(
        &self,
        user_email: &str,
        habit_name: &str,
        days_ahead: Option<i64>,
    ) -> Result<usize, AppError> {
        let horizon = days_ahead.unwrap_or(DEFAULT_HORIZON_DAYS);
        validate_days_ahead(horizon)?;
        let db = self.lock_db();
        let conn = db.connection();
        Ok(generator::generate_day_instances(
            conn,
            user_email,
            habit_name,
            dates::today(),
            horizon,
        )?)
    }

    /// Realize the user's instances matching the condition (default: due
    /// exactly today) into progress placeholders.
    pub fn migrate_instances(
        &self,
        user_email: &str,
        condition: DateCondition,
        date: Option<NaiveDate>,
    ) -> Result<usize, AppError> {
        let db = self.lock_db();
        let conn = db.connection();
        let date = date.unwrap_or_else(dates::today);
        Ok(migrator::migrate_instances(conn, user_email, condition, date)?)
    }

    /// Backfill placeholder progress rows for scheduled days before today.
    pub fn fill_missed_progress(&self, user_email: &str) -> Result<usize, AppError> {
        let db = self.lock_db();
        let conn = db.connection();
        Ok(filler::fill_missed_progress(conn, user_email, dates::today())?)
    }

    /// Record a progress value against today's entry for the habit.
    pub fn record_progress(
        &self,
        user_email: &str,
        habit_name: &str,
        value: f64,
    ) -> Result<Progress, AppError> {
        let db = self.lock_db();
        let conn = db.connection();
        recorder::record_progress(conn, user_email, habit_name, value, dates::today())
    }
}

fn habits_or_invalid(result: rusqlite::Result<Vec<Habit>>) -> Result<Vec<Habit>, AppError> {
    result.map_err(|e| match e {
        rusqlite::Error::FromSqlConversionFailure(_, _, _) => AppError::InvalidData(e.to_string()),
        other => AppError::Database(other),
    })
}
