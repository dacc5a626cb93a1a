//! Streak bookkeeping for a single habit.
//!
//! Both operations are pure: they take the current record plus the caller's
//! local calendar date and return the updated record. Recording the toggle in
//! the [`CompletionLedger`](crate::models::CompletionLedger) is left to the caller.

use crate::models::Habit;
use chrono::NaiveDate;

pub fn yesterday(today: NaiveDate) -> NaiveDate {
    today.pred_opt().unwrap_or(today)
}

/// Flips today's completion and moves the streak accordingly.
///
/// Unchecking only rewinds the streak when the completion being undone is
/// today's; a stale `completed` flag from another day just clears.
pub fn toggle_completion(habit: &Habit, today: NaiveDate) -> Habit {
    let mut next = habit.clone();
    next.completed = !habit.completed;
    let yesterday = yesterday(today);

    if next.completed {
        if habit.last_completed_date == Some(yesterday) {
            next.streak = habit.streak.saturating_add(1);
        } else if habit.last_completed_date != Some(today) {
            next.streak = 1;
        }
        next.last_completed_date = Some(today);
    } else if habit.last_completed_date == Some(today) {
        if habit.streak == 1 {
            next.streak = 0;
            next.last_completed_date = None;
        } else if habit.streak > 1 {
            next.streak = habit.streak - 1;
            next.last_completed_date = Some(yesterday);
        }
    }

    next
}

/// Clears state left over from an earlier day. Idempotent for a given `today`.
pub fn daily_rollover(habit: &Habit, today: NaiveDate) -> Habit {
    let mut next = habit.clone();

    if habit.completed && habit.last_completed_date != Some(today) {
        next.completed = false;
    }

    let within_grace = matches!(
        habit.last_completed_date,
        Some(date) if date == today || date == yesterday(today)
    );
    if habit.streak > 0 && !within_grace {
        next.streak = 0;
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit(completed: bool, streak: u32, last: Option<NaiveDate>) -> Habit {
        let created = Utc.with_ymd_and_hms(2023, 12, 1, 9, 0, 0).unwrap();
        Habit {
            completed,
            streak,
            last_completed_date: last,
            ..Habit::new("h1", "Meditate", "Brain", created)
        }
    }

    /// Rolled-over states on `today` whose history is carried by the streak.
    fn reachable_states(today: NaiveDate) -> Vec<Habit> {
        let mut states = vec![habit(false, 0, None)];
        for streak in 1..5 {
            states.push(habit(true, streak, Some(today)));
            states.push(habit(false, streak, Some(yesterday(today))));
        }
        states
    }

    #[test]
    fn first_completion_starts_streak() {
        let next = toggle_completion(&habit(false, 0, None), day(2024, 1, 1));
        assert_eq!(next, habit(true, 1, Some(day(2024, 1, 1))));
    }

    #[test]
    fn rollover_keeps_streak_within_grace_day() {
        let h = habit(true, 5, Some(day(2024, 1, 1)));
        let next = daily_rollover(&h, day(2024, 1, 2));
        assert!(!next.completed);
        assert_eq!(next.streak, 5);
        assert_eq!(next.last_completed_date, Some(day(2024, 1, 1)));
    }

    #[test]
    fn rollover_resets_streak_after_gap() {
        let h = habit(true, 5, Some(day(2024, 1, 1)));
        let next = daily_rollover(&h, day(2024, 1, 5));
        assert!(!next.completed);
        assert_eq!(next.streak, 0);
        assert_eq!(next.last_completed_date, Some(day(2024, 1, 1)));
    }

    #[test]
    fn uncheck_fresh_streak_clears_date() {
        let h = habit(true, 1, Some(day(2024, 1, 1)));
        let next = toggle_completion(&h, day(2024, 1, 1));
        assert_eq!(next, habit(false, 0, None));
    }

    #[test]
    fn uncheck_long_streak_reanchors_to_yesterday() {
        let h = habit(true, 3, Some(day(2024, 1, 5)));
        let next = toggle_completion(&h, day(2024, 1, 5));
        assert_eq!(next, habit(false, 2, Some(day(2024, 1, 4))));
    }

    #[test]
    fn continuing_streak_increments() {
        let today = day(2024, 3, 1);
        for streak in 1..10 {
            let h = habit(false, streak, Some(yesterday(today)));
            assert_eq!(toggle_completion(&h, today).streak, streak + 1);
        }
    }

    #[test]
    fn gap_restarts_streak() {
        let today = day(2024, 3, 1);
        for gap in 2..6 {
            let h = habit(false, 7, Some(today - Duration::days(gap)));
            let next = toggle_completion(&h, today);
            assert_eq!(next.streak, 1);
            assert_eq!(next.last_completed_date, Some(today));
        }
    }

    #[test]
    fn streak_without_date_falls_back_to_new_streak() {
        let next = toggle_completion(&habit(false, 4, None), day(2024, 1, 1));
        assert_eq!(next.streak, 1);
    }

    #[test]
    fn same_day_reentry_keeps_streak() {
        let h = habit(false, 3, Some(day(2024, 1, 5)));
        let next = toggle_completion(&h, day(2024, 1, 5));
        assert!(next.completed);
        assert_eq!(next.streak, 3);
    }

    #[test]
    fn uncheck_from_other_day_only_clears_flag() {
        let h = habit(true, 4, Some(day(2024, 1, 2)));
        let next = toggle_completion(&h, day(2024, 1, 5));
        assert_eq!(next, habit(false, 4, Some(day(2024, 1, 2))));
    }

    #[test]
    fn double_toggle_restores_state() {
        let today = day(2024, 1, 1);
        for h in reachable_states(today) {
            let twice = toggle_completion(&toggle_completion(&h, today), today);
            assert_eq!(twice, h);
        }
    }

    #[test]
    fn rollover_is_idempotent() {
        let today = day(2024, 2, 29);
        let candidates = [
            habit(true, 5, Some(day(2024, 2, 28))),
            habit(true, 2, Some(day(2024, 2, 20))),
            habit(false, 3, Some(day(2024, 2, 29))),
            habit(true, 1, Some(day(2024, 2, 29))),
            habit(false, 6, None),
            habit(true, 0, None),
        ];
        for h in candidates {
            let once = daily_rollover(&h, today);
            assert_eq!(daily_rollover(&once, today), once);
        }
    }

    #[test]
    fn rollover_leaves_todays_completion_alone() {
        let h = habit(true, 2, Some(day(2024, 1, 5)));
        assert_eq!(daily_rollover(&h, day(2024, 1, 5)), h);
    }

    #[test]
    fn yesterday_crosses_month_and_year() {
        assert_eq!(yesterday(day(2024, 3, 1)), day(2024, 2, 29));
        assert_eq!(yesterday(day(2024, 1, 1)), day(2023, 12, 31));
    }
}
