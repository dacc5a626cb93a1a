use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub icon: String,
    /// Completed today. Not a historical flag; see [`CompletionLedger`].
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    pub fn new(id: impl Into<String>, name: impl Into<String>, icon: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            completed: false,
            streak: 0,
            last_completed_date: None,
            created_at: now,
        }
    }
}

/// Per-day, per-habit completion history keyed by `yyyy-MM-dd`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct CompletionLedger(BTreeMap<String, BTreeMap<String, bool>>);

impl CompletionLedger {
    pub fn record(&mut self, date: NaiveDate, habit_id: &str, value: bool) {
        self.0
            .entry(date_key(date))
            .or_default()
            .insert(habit_id.to_string(), value);
    }

    pub fn is_completed(&self, date: NaiveDate, habit_id: &str) -> bool {
        self.0
            .get(&date_key(date))
            .and_then(|day| day.get(habit_id))
            .copied()
            .unwrap_or(false)
    }

    /// Removes the habit from every day; days left empty are dropped.
    pub fn purge(&mut self, habit_id: &str) {
        self.0.retain(|_, day| {
            day.remove(habit_id);
            !day.is_empty()
        });
    }

    pub fn completed_count(&self, date: NaiveDate, habits: &[Habit]) -> usize {
        match self.0.get(&date_key(date)) {
            Some(day) => habits
                .iter()
                .filter(|habit| day.get(&habit.id).copied().unwrap_or(false))
                .count(),
            None => 0,
        }
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn references(&self, habit_id: &str) -> bool {
        self.0.values().any(|day| day.contains_key(habit_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HabitSet {
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default, rename = "completionStatus", alias = "habitCompletionStatus")]
    pub ledger: CompletionLedger,
}

pub fn default_habits(now: DateTime<Utc>) -> Vec<Habit> {
    vec![
        Habit::new("1", "Drink 8 glasses of water", "GlassWater", now),
        Habit::new("2", "Read for 20 minutes", "BookOpen", now),
        Habit::new("3", "Meditate for 10 minutes", "Brain", now),
        Habit::new("4", "Morning walk", "Sun", now),
    ]
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct HabitRequest {
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct RecapQuery {
    pub month: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodaySummary {
    pub date: String,
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ProgressPoint {
    pub date: String,
    pub weekday: String,
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    All,
    Partial,
    None,
}

#[derive(Debug, Serialize)]
pub struct RecapDay {
    pub date: String,
    pub weekday: String,
    pub status: DayStatus,
}

#[derive(Debug, Serialize)]
pub struct HabitRecap {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub completed_dates: Vec<String>,
    pub achieved: u32,
    pub goal: u32,
    pub percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct MonthlyRecap {
    pub month: String,
    pub label: String,
    pub days: Vec<RecapDay>,
    pub habits: Vec<HabitRecap>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
