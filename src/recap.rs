use crate::errors::AppError;
use crate::models::{
    CompletionLedger, DayStatus, Habit, HabitRecap, MonthlyRecap, ProgressPoint, RecapDay,
    date_key,
};
use chrono::{Datelike, Duration, Months, NaiveDate};

/// Parses `yyyy-MM` into the first day of that month.
pub fn parse_month(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request("month must be formatted as yyyy-MM"))
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn build_recap(month: NaiveDate, habits: &[Habit], ledger: &CompletionLedger) -> MonthlyRecap {
    let start = month_start(month);
    let days = month_days(start);
    let goal = days.len() as u32;

    let recap_days = days
        .iter()
        .map(|&date| RecapDay {
            date: date_key(date),
            weekday: date.format("%a").to_string(),
            status: day_status(date, habits, ledger),
        })
        .collect();

    let habit_rows = habits
        .iter()
        .map(|habit| {
            let completed_dates: Vec<String> = days
                .iter()
                .filter(|&&date| ledger.is_completed(date, &habit.id))
                .map(|&date| date_key(date))
                .collect();
            let achieved = completed_dates.len() as u32;
            let percentage = if goal == 0 {
                0.0
            } else {
                (f64::from(achieved) / f64::from(goal) * 100.0).min(100.0)
            };

            HabitRecap {
                id: habit.id.clone(),
                name: habit.name.clone(),
                icon: habit.icon.clone(),
                completed_dates,
                achieved,
                goal,
                percentage,
            }
        })
        .collect();

    MonthlyRecap {
        month: start.format("%Y-%m").to_string(),
        label: start.format("%B %Y").to_string(),
        days: recap_days,
        habits: habit_rows,
    }
}

pub fn build_progress_at(today: NaiveDate, habits: &[Habit], ledger: &CompletionLedger) -> Vec<ProgressPoint> {
    (0..7)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            ProgressPoint {
                date: date_key(date),
                weekday: date.format("%a").to_string(),
                completed: ledger.completed_count(date, habits),
                total: habits.len(),
            }
        })
        .collect()
}

fn day_status(date: NaiveDate, habits: &[Habit], ledger: &CompletionLedger) -> DayStatus {
    if habits.is_empty() {
        return DayStatus::None;
    }
    match ledger.completed_count(date, habits) {
        0 => DayStatus::None,
        n if n == habits.len() => DayStatus::All,
        _ => DayStatus::Partial,
    }
}

fn month_days(start: NaiveDate) -> Vec<NaiveDate> {
    let end = start
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX);
    start.iter_days().take_while(|date| *date < end).collect()
}
