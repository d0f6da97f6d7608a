// src/constants.rs

/// Calendar-day format used wherever a date crosses the store boundary
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default number of days ahead the instance generator projects
pub const DEFAULT_HORIZON_DAYS: i64 = 7;

/// Maximum generation horizon in days
pub const MAX_HORIZON_DAYS: i64 = 365;

/// Maximum interval increment in days
pub const MAX_INCREMENT_DAYS: i64 = 365;

/// Maximum habit name length
pub const MAX_HABIT_NAME_LEN: usize = 100;

/// Maximum habit description length
pub const MAX_DESCRIPTION_LEN: usize = 500;
