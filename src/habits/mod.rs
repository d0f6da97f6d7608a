//! Habit definition management: create, update, delete, list.
//!
//! Every write keeps the invariant that a habit has exactly one recurrence
//! configuration matching its declared kind: rule rows are replaced, never
//! accumulated.

use crate::db::Database;
use crate::error::{is_fk_violation, is_unique_violation, AppError};
use crate::models::{Habit, HabitKind, IntervalRule, Recurrence, WeeklyRule};
use crate::validation::{
    validate_color, validate_description, validate_goal_value, validate_habit_name,
    validate_increment_days, validate_weekdays,
};
use chrono::Weekday;
use log::warn;
use serde::Deserialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Incoming habit definition from the calling layer.
#[derive(Debug, Clone, Deserialize)]
pub struct HabitSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: String,
    pub color: String,
    pub recurrence: String,
    #[serde(default)]
    pub goal_value: Option<f64>,
    #[serde(default)]
    pub goal_unit: Option<String>,
    #[serde(default)]
    pub increment_days: Option<i64>,
    #[serde(default)]
    pub weekdays: Vec<String>,
}

/// A habit together with its recurrence configuration.
#[derive(Debug, Clone)]
pub struct HabitDetail {
    pub habit: Habit,
    pub increment_days: Option<i64>,
    pub weekdays: Vec<Weekday>,
}

enum RuleConfig {
    Interval(i64),
    Weekly(Vec<Weekday>),
}

pub struct HabitManager {
    db: Arc<Mutex<Database>>,
}

impl HabitManager {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    fn lock_db(&self) -> MutexGuard<'_, Database> {
        match self.db.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("HabitManager: database mutex was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    pub fn create_habit(&self, user_email: &str, spec: &HabitSpec) -> Result<Habit, AppError> {
        let (habit, config) = validated_habit(user_email, spec)?;

        let db = self.lock_db();
        let conn = db.connection();

        habit.save(conn).map_err(|e| {
            if is_fk_violation(&e) {
                AppError::NotFound { entity: "User" }
            } else if is_unique_violation(&e) {
                AppError::AlreadyExists {
                    name: habit.name.clone(),
                }
            } else {
                AppError::Database(e)
            }
        })?;

        write_rule_config(conn, user_email, &habit.name, &config)?;
        Ok(habit)
    }

    /// Update a habit's attributes and replace its recurrence configuration.
    pub fn update_habit(&self, user_email: &str, spec: &HabitSpec) -> Result<Habit, AppError> {
        let (habit, config) = validated_habit(user_email, spec)?;

        let db = self.lock_db();
        let conn = db.connection();

        if !habit.update(conn)? {
            return Err(AppError::NotFound { entity: "Habit" });
        }

        // Clear both kinds so a recurrence switch cannot leave a stale rule
        IntervalRule::delete_for_habit(conn, user_email, &habit.name)?;
        WeeklyRule::delete_for_habit(conn, user_email, &habit.name)?;
        write_rule_config(conn, user_email, &habit.name, &config)?;
        Ok(habit)
    }

    /// Delete a habit; its rules, instances, and progress cascade away.
    pub fn delete_habit(&self, user_email: &str, name: &str) -> Result<bool, AppError> {
        let db = self.lock_db();
        let conn = db.connection();
        Ok(Habit::delete(conn, user_email, name)?)
    }

    pub fn list_habits(&self, user_email: &str) -> Result<Vec<Habit>, AppError> {
        let db = self.lock_db();
        let conn = db.connection();
        Ok(Habit::find_all_for_user(conn, user_email)?)
    }

    pub fn get_habit(&self, user_email: &str, name: &str) -> Result<Option<HabitDetail>, AppError> {
        let db = self.lock_db();
        let conn = db.connection();

        let habit = match Habit::find(conn, user_email, name)? {
            Some(habit) => habit,
            None => return Ok(None),
        };

        let increment_days =
            IntervalRule::find(conn, user_email, name)?.map(|rule| rule.increment_days);
        let weekdays = WeeklyRule::days(conn, user_email, name)?;

        Ok(Some(HabitDetail {
            habit,
            increment_days,
            weekdays,
        }))
    }
}

fn validated_habit(user_email: &str, spec: &HabitSpec) -> Result<(Habit, RuleConfig), AppError> {
    let name = validate_habit_name(&spec.name)?;
    validate_description(&spec.description)?;
    validate_color(&spec.color)?;
    if let Some(goal) = spec.goal_value {
        validate_goal_value(goal)?;
    }

    let kind = HabitKind::parse(&spec.kind).ok_or_else(|| AppError::InvalidInput {
        field: "kind",
        reason: format!("'{}' is not 'build' or 'quit'", spec.kind),
    })?;
    let recurrence = Recurrence::parse(&spec.recurrence).ok_or_else(|| AppError::InvalidInput {
        field: "recurrence",
        reason: format!("'{}' is not 'interval' or 'weekly'", spec.recurrence),
    })?;

    let config = match recurrence {
        Recurrence::Interval => {
            let increment = spec.increment_days.ok_or(AppError::InvalidInput {
                field: "increment_days",
                reason: "required for interval habits".into(),
            })?;
            validate_increment_days(increment)?;
            RuleConfig::Interval(increment)
        }
        Recurrence::Weekly => RuleConfig::Weekly(validate_weekdays(&spec.weekdays)?),
    };

    let mut habit = Habit::new(user_email, name, recurrence);
    habit.description = spec.description.trim().to_string();
    habit.kind = kind;
    habit.color = spec.color.clone();
    habit.goal_value = spec.goal_value;
    habit.goal_unit = spec.goal_unit.clone();

    Ok((habit, config))
}

fn write_rule_config(
    conn: &rusqlite::Connection,
    user_email: &str,
    habit_name: &str,
    config: &RuleConfig,
) -> Result<(), AppError> {
    match config {
        RuleConfig::Interval(increment) => {
            IntervalRule::replace(conn, user_email, habit_name, *increment)?;
        }
        RuleConfig::Weekly(days) => {
            WeeklyRule::replace(conn, user_email, habit_name, days)?;
        }
    }
    Ok(())
}
