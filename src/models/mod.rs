pub mod habit;
pub mod instance;
pub mod progress;
pub mod recurrence;
pub mod user;

pub use habit::{Habit, HabitKind, Recurrence};
pub use instance::{DateCondition, Instance};
pub use progress::Progress;
pub use recurrence::{IntervalRule, WeeklyRule};
pub use user::User;
