use crate::constants::*;
use crate::dates::parse_weekday;
use crate::error::AppError;
use chrono::Weekday;

/// Validate a habit name. Returns the trimmed name if valid.
pub fn validate_habit_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput {
            field: "name",
            reason: "cannot be empty".into(),
        });
    }
    if name.len() > MAX_HABIT_NAME_LEN {
        return Err(AppError::InvalidInput {
            field: "name",
            reason: format!("cannot exceed {} characters", MAX_HABIT_NAME_LEN),
        });
    }
    Ok(name)
}

pub fn validate_description(description: &str) -> Result<(), AppError> {
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(AppError::InvalidInput {
            field: "description",
            reason: format!("cannot exceed {} characters", MAX_DESCRIPTION_LEN),
        });
    }
    Ok(())
}

/// Validate a display color (#RRGGBB).
pub fn validate_color(color: &str) -> Result<(), AppError> {
    let err = |reason: &str| AppError::InvalidInput {
        field: "color",
        reason: reason.into(),
    };

    if color.len() != 7 || !color.starts_with('#') {
        return Err(err("must be in #RRGGBB format"));
    }
    if !color[1..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(err("must contain only hex digits"));
    }
    Ok(())
}

/// Validate a goal value: finite and non-negative.
pub fn validate_goal_value(value: f64) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::InvalidInput {
            field: "goal_value",
            reason: "must be a finite number".into(),
        });
    }
    if value < 0.0 {
        return Err(AppError::InvalidInput {
            field: "goal_value",
            reason: "cannot be negative".into(),
        });
    }
    Ok(())
}

/// Validate an interval increment in days.
pub fn validate_increment_days(days: i64) -> Result<(), AppError> {
    if days <= 0 {
        return Err(AppError::InvalidInput {
            field: "increment_days",
            reason: "must be positive".into(),
        });
    }
    if days > MAX_INCREMENT_DAYS {
        return Err(AppError::InvalidInput {
            field: "increment_days",
            reason: format!("cannot exceed {} days", MAX_INCREMENT_DAYS),
        });
    }
    Ok(())
}

/// Validate an instance generation horizon in days.
pub fn validate_days_ahead(days: i64) -> Result<(), AppError> {
    if days < 0 {
        return Err(AppError::InvalidInput {
            field: "days_ahead",
            reason: "cannot be negative".into(),
        });
    }
    if days > MAX_HORIZON_DAYS {
        return Err(AppError::InvalidInput {
            field: "days_ahead",
            reason: format!("cannot exceed {} days", MAX_HORIZON_DAYS),
        });
    }
    Ok(())
}

/// Validate a list of weekday names. An empty list is allowed (a weekly
/// habit with no selected days is simply never due).
pub fn validate_weekdays(names: &[String]) -> Result<Vec<Weekday>, AppError> {
    names.iter().map(|name| parse_weekday(name)).collect()
}
