//! Backfill of progress placeholders for days the app never saw.
//!
//! When the user stays away longer than the instance generation horizon, the
//! migrator has nothing to work with. The filler reconstructs the missing
//! placeholder history directly from the recurrence rule instead of from
//! stale instance rows.

use crate::dates::{interval_dates, weekly_dates};
use crate::models::{Habit, IntervalRule, Progress, Recurrence, WeeklyRule};
use chrono::NaiveDate;
use rusqlite::{Connection, Result};

/// Insert placeholder progress rows for every scheduled day between each
/// habit's last recorded progress and `today` (exclusive). Existing rows are
/// never overwritten. Returns the number of rows inserted.
///
/// Habits with no recurrence configuration, no gap, or a gap smaller than
/// their interval increment are skipped. Store failures propagate: the
/// caller must know the fill did not complete.
pub fn fill_missed_progress(conn: &Connection, user_email: &str, today: NaiveDate) -> Result<usize> {
    let habits = Habit::find_all_for_user(conn, user_email)?;

    let mut inserted = 0;
    for habit in habits {
        let last = Progress::last_date(conn, user_email, &habit.name)?.unwrap_or(today);
        if last >= today {
            continue;
        }

        let missed = match habit.recurrence {
            Recurrence::Interval => {
                let rule = match IntervalRule::find(conn, user_email, &habit.name)? {
                    Some(rule) => rule,
                    None => continue,
                };
                if (today - last).num_days() <= rule.increment_days {
                    continue;
                }
                interval_dates(last, today, rule.increment_days)
            }
            Recurrence::Weekly => {
                let days = WeeklyRule::days(conn, user_email, &habit.name)?;
                if days.is_empty() {
                    continue;
                }
                weekly_dates(last, today, &days)
            }
        };

        for date in missed.into_iter().filter(|&date| date < today) {
            if Progress::insert_placeholder_if_absent(conn, user_email, &habit.name, date)? {
                inserted += 1;
            }
        }
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::test_utils::setup_test_db;
    use chrono::Weekday;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn seed_habit(conn: &Connection, name: &str, recurrence: Recurrence) {
        if User::find(conn, "ada@example.com").unwrap().is_none() {
            User::create(conn, "ada@example.com").unwrap();
        }
        Habit::new("ada@example.com", name, recurrence).save(conn).unwrap();
    }

    fn progress_dates(conn: &Connection, name: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(
                "SELECT progress_date FROM habit_progress WHERE habit_name = ?1 ORDER BY progress_date",
            )
            .unwrap();
        let rows = stmt.query_map([name], |row| row.get(0)).unwrap();
        rows.collect::<Result<Vec<String>>>().unwrap()
    }

    #[test]
    fn test_fills_interval_gap_strictly_before_today() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_habit(conn, "Run", Recurrence::Interval);
        IntervalRule::replace(conn, "ada@example.com", "Run", 2).unwrap();
        Progress::insert_placeholder_if_absent(conn, "ada@example.com", "Run", d(2023, 6, 10))
            .unwrap();

        let inserted = fill_missed_progress(conn, "ada@example.com", d(2023, 6, 15)).unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(
            progress_dates(conn, "Run"),
            vec!["2023-06-10", "2023-06-12", "2023-06-14"]
        );
    }

    #[test]
    fn test_skips_when_gap_within_increment() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_habit(conn, "Run", Recurrence::Interval);
        IntervalRule::replace(conn, "ada@example.com", "Run", 2).unwrap();
        Progress::insert_placeholder_if_absent(conn, "ada@example.com", "Run", d(2023, 6, 14))
            .unwrap();

        let inserted = fill_missed_progress(conn, "ada@example.com", d(2023, 6, 15)).unwrap();

        assert_eq!(inserted, 0);
        assert_eq!(progress_dates(conn, "Run"), vec!["2023-06-14"]);
    }

    #[test]
    fn test_skips_habit_with_no_progress_history() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_habit(conn, "Run", Recurrence::Interval);
        IntervalRule::replace(conn, "ada@example.com", "Run", 2).unwrap();

        let inserted = fill_missed_progress(conn, "ada@example.com", d(2023, 6, 15)).unwrap();

        assert_eq!(inserted, 0);
        assert!(progress_dates(conn, "Run").is_empty());
    }

    #[test]
    fn test_skips_interval_habit_without_rule() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_habit(conn, "Run", Recurrence::Interval);
        Progress::insert_placeholder_if_absent(conn, "ada@example.com", "Run", d(2023, 6, 1))
            .unwrap();

        let inserted = fill_missed_progress(conn, "ada@example.com", d(2023, 6, 15)).unwrap();
        assert_eq!(inserted, 0);
    }

    #[test]
    fn test_fills_weekly_gap() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_habit(conn, "Yoga", Recurrence::Weekly);
        WeeklyRule::replace(
            conn,
            "ada@example.com",
            "Yoga",
            &[Weekday::Mon, Weekday::Wed, Weekday::Fri],
        )
        .unwrap();
        // 2023-01-01 is a Sunday, 2023-01-07 a Saturday
        Progress::insert_placeholder_if_absent(conn, "ada@example.com", "Yoga", d(2023, 1, 1))
            .unwrap();

        let inserted = fill_missed_progress(conn, "ada@example.com", d(2023, 1, 7)).unwrap();

        assert_eq!(inserted, 3);
        assert_eq!(
            progress_dates(conn, "Yoga"),
            vec!["2023-01-01", "2023-01-02", "2023-01-04", "2023-01-06"]
        );
    }

    #[test]
    fn test_weekly_excludes_today() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_habit(conn, "Yoga", Recurrence::Weekly);
        WeeklyRule::replace(conn, "ada@example.com", "Yoga", &[Weekday::Fri]).unwrap();
        Progress::insert_placeholder_if_absent(conn, "ada@example.com", "Yoga", d(2023, 1, 1))
            .unwrap();

        // 2023-01-06 is a Friday; it is today, so nothing to fill
        let inserted = fill_missed_progress(conn, "ada@example.com", d(2023, 1, 6)).unwrap();
        assert_eq!(inserted, 0);
    }

    #[test]
    fn test_skips_weekly_habit_with_no_days() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_habit(conn, "Yoga", Recurrence::Weekly);
        Progress::insert_placeholder_if_absent(conn, "ada@example.com", "Yoga", d(2023, 1, 1))
            .unwrap();

        let inserted = fill_missed_progress(conn, "ada@example.com", d(2023, 1, 31)).unwrap();
        assert_eq!(inserted, 0);
    }

    #[test]
    fn test_never_overwrites_recorded_progress() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_habit(conn, "Run", Recurrence::Interval);
        IntervalRule::replace(conn, "ada@example.com", "Run", 2).unwrap();
        Progress::insert_placeholder_if_absent(conn, "ada@example.com", "Run", d(2023, 6, 10))
            .unwrap();
        Progress::insert_placeholder_if_absent(conn, "ada@example.com", "Run", d(2023, 6, 12))
            .unwrap();
        Progress::update_entry(conn, "ada@example.com", "Run", d(2023, 6, 12), 6.0, true, 3)
            .unwrap();

        fill_missed_progress(conn, "ada@example.com", d(2023, 6, 15)).unwrap();

        let row = Progress::find(conn, "ada@example.com", "Run", d(2023, 6, 12))
            .unwrap()
            .unwrap();
        assert_eq!(row.progress, 6.0);
        assert!(row.completed);
        assert_eq!(row.streak, 3);
    }

    #[test]
    fn test_fills_multiple_habits_independently() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_habit(conn, "Run", Recurrence::Interval);
        IntervalRule::replace(conn, "ada@example.com", "Run", 2).unwrap();
        seed_habit(conn, "Yoga", Recurrence::Weekly);
        WeeklyRule::replace(conn, "ada@example.com", "Yoga", &[Weekday::Mon]).unwrap();

        Progress::insert_placeholder_if_absent(conn, "ada@example.com", "Run", d(2023, 1, 1))
            .unwrap();
        Progress::insert_placeholder_if_absent(conn, "ada@example.com", "Yoga", d(2023, 1, 1))
            .unwrap();

        let inserted = fill_missed_progress(conn, "ada@example.com", d(2023, 1, 9)).unwrap();

        // Run: 01-03, 01-05, 01-07 (01-09 is today); Yoga: Monday 01-02
        assert_eq!(inserted, 4);
        assert_eq!(
            progress_dates(conn, "Run"),
            vec!["2023-01-01", "2023-01-03", "2023-01-05", "2023-01-07"]
        );
        assert_eq!(progress_dates(conn, "Yoga"), vec!["2023-01-01", "2023-01-02"]);
    }
}
