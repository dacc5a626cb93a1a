//! Namespace-level operations: everything that loads a habit set, runs the
//! streak engine over it and writes it back.

use crate::errors::AppError;
use crate::identity::Namespace;
use crate::models::{
    Habit, HabitRequest, HabitSet, MonthlyRecap, ProgressPoint, TodaySummary, date_key,
    default_habits,
};
use crate::recap::{build_progress_at, build_recap};
use crate::state::{AppState, Session};
use crate::streak::{daily_rollover, toggle_completion};
use crate::validation::validate_habit;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{HashMap, HashSet, hash_map::Entry};
use tracing::{debug, error, info};
use uuid::Uuid;

pub async fn list_habits(state: &AppState, ns: &Namespace, today: NaiveDate) -> Result<Vec<Habit>, AppError> {
    let mut sessions = state.sessions.lock().await;
    let session = open_session(state, &mut sessions, ns, today).await?;
    Ok(session.data.habits.clone())
}

pub async fn today_summary(state: &AppState, ns: &Namespace, today: NaiveDate) -> Result<TodaySummary, AppError> {
    let mut sessions = state.sessions.lock().await;
    let session = open_session(state, &mut sessions, ns, today).await?;
    let habits = &session.data.habits;
    Ok(TodaySummary {
        date: date_key(today),
        completed: habits.iter().filter(|habit| habit.completed).count(),
        total: habits.len(),
    })
}

pub async fn create_habit(
    state: &AppState,
    ns: &Namespace,
    request: &HabitRequest,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<Habit, AppError> {
    let (name, icon) = validate_habit(request)?;
    let mut sessions = state.sessions.lock().await;
    let session = open_session(state, &mut sessions, ns, today).await?;

    let habit = Habit::new(Uuid::new_v4().to_string(), name, icon, now);
    let mut next = session.data.clone();
    next.habits.push(habit.clone());
    commit(state, ns, session, next).await?;

    info!(namespace = %ns.key(), habit = %habit.id, "habit created");
    Ok(habit)
}

pub async fn edit_habit(
    state: &AppState,
    ns: &Namespace,
    id: &str,
    request: &HabitRequest,
    today: NaiveDate,
) -> Result<Habit, AppError> {
    let (name, icon) = validate_habit(request)?;
    let mut sessions = state.sessions.lock().await;
    let session = open_session(state, &mut sessions, ns, today).await?;

    let mut next = session.data.clone();
    let habit = find_habit(&mut next, id)?;
    habit.name = name;
    habit.icon = icon;
    let updated = habit.clone();
    commit(state, ns, session, next).await?;

    Ok(updated)
}

pub async fn delete_habit(state: &AppState, ns: &Namespace, id: &str, today: NaiveDate) -> Result<(), AppError> {
    let mut sessions = state.sessions.lock().await;
    let session = open_session(state, &mut sessions, ns, today).await?;

    let mut next = session.data.clone();
    let before = next.habits.len();
    next.habits.retain(|habit| habit.id != id);
    if next.habits.len() == before {
        return Err(habit_not_found(id));
    }
    next.ledger.purge(id);
    commit(state, ns, session, next).await?;

    info!(namespace = %ns.key(), habit = %id, "habit deleted");
    Ok(())
}

pub async fn toggle_habit(state: &AppState, ns: &Namespace, id: &str, today: NaiveDate) -> Result<Habit, AppError> {
    let mut sessions = state.sessions.lock().await;
    let session = open_session(state, &mut sessions, ns, today).await?;

    let mut next = session.data.clone();
    let habit = find_habit(&mut next, id)?;
    let toggled = toggle_completion(habit, today);
    *habit = toggled.clone();
    next.ledger.record(today, id, toggled.completed);
    commit(state, ns, session, next).await?;

    debug!(
        namespace = %ns.key(),
        habit = %id,
        completed = toggled.completed,
        streak = toggled.streak,
        "habit toggled"
    );
    Ok(toggled)
}

pub async fn progress(state: &AppState, ns: &Namespace, today: NaiveDate) -> Result<Vec<ProgressPoint>, AppError> {
    let mut sessions = state.sessions.lock().await;
    let session = open_session(state, &mut sessions, ns, today).await?;
    Ok(build_progress_at(today, &session.data.habits, &session.data.ledger))
}

pub async fn monthly_recap(
    state: &AppState,
    ns: &Namespace,
    month: NaiveDate,
    today: NaiveDate,
) -> Result<MonthlyRecap, AppError> {
    let mut sessions = state.sessions.lock().await;
    let session = open_session(state, &mut sessions, ns, today).await?;
    Ok(build_recap(month, &session.data.habits, &session.data.ledger))
}

pub async fn export_data(state: &AppState, ns: &Namespace, today: NaiveDate) -> Result<HabitSet, AppError> {
    require_user(ns)?;
    let mut sessions = state.sessions.lock().await;
    let session = open_session(state, &mut sessions, ns, today).await?;
    Ok(session.data.clone())
}

/// Replaces the namespace's whole habit set, as pushed by a syncing client.
pub async fn import_data(state: &AppState, ns: &Namespace, mut data: HabitSet, today: NaiveDate) -> Result<(), AppError> {
    require_user(ns)?;
    check_import(&data)?;
    let mut sessions = state.sessions.lock().await;

    roll_over(&mut data, today);
    persist(state, ns, &data).await?;

    info!(
        namespace = %ns.key(),
        habits = data.habits.len(),
        days = data.ledger.dates().count(),
        "user data saved"
    );
    sessions.insert(
        ns.key(),
        Session {
            data,
            rolled_over_on: Some(today),
        },
    );
    Ok(())
}

async fn open_session<'a>(
    state: &AppState,
    sessions: &'a mut HashMap<String, Session>,
    ns: &Namespace,
    today: NaiveDate,
) -> Result<&'a mut Session, AppError> {
    let key = ns.key();

    let session = match sessions.entry(key.clone()) {
        Entry::Occupied(entry) => entry.into_mut(),
        Entry::Vacant(entry) => {
            let data = load_or_seed(state, ns).await?;
            entry.insert(Session {
                data,
                rolled_over_on: None,
            })
        }
    };

    if session.rolled_over_on != Some(today) {
        let mut next = session.data.clone();
        if roll_over(&mut next, today) {
            commit(state, ns, session, next).await?;
            debug!(namespace = %key, date = %today, "rolled over stale habits");
        }
        session.rolled_over_on = Some(today);
    }

    Ok(session)
}

async fn load_or_seed(state: &AppState, ns: &Namespace) -> Result<HabitSet, AppError> {
    if let Some(data) = state.store.load(&ns.key()).await? {
        return Ok(data);
    }

    let habits = if state.seed_defaults {
        default_habits(Utc::now())
    } else {
        Vec::new()
    };
    let data = HabitSet {
        habits,
        ..HabitSet::default()
    };
    persist(state, ns, &data).await?;
    info!(namespace = %ns.key(), "initialized namespace");
    Ok(data)
}

/// Applies the daily rollover to every habit; returns whether anything changed.
fn roll_over(data: &mut HabitSet, today: NaiveDate) -> bool {
    let mut changed = false;
    for habit in data.habits.iter_mut() {
        let next = daily_rollover(habit, today);
        if next != *habit {
            *habit = next;
            changed = true;
        }
    }
    changed
}

async fn persist(state: &AppState, ns: &Namespace, data: &HabitSet) -> Result<(), AppError> {
    state.store.save(&ns.key(), data).await.inspect_err(|err| {
        error!(namespace = %ns.key(), "failed to persist habits: {}", err.message);
    })
}

/// Saves `next` and only then makes it the session's data.
async fn commit(state: &AppState, ns: &Namespace, session: &mut Session, next: HabitSet) -> Result<(), AppError> {
    persist(state, ns, &next).await?;
    session.data = next;
    Ok(())
}

/// Synced sets must have unique ids and pass the same checks as local edits.
fn check_import(data: &HabitSet) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for habit in &data.habits {
        if !seen.insert(habit.id.as_str()) {
            return Err(AppError::bad_request(format!("duplicate habit id '{}'", habit.id)));
        }
        validate_habit(&HabitRequest {
            name: habit.name.clone(),
            icon: habit.icon.clone(),
        })?;
    }
    Ok(())
}

fn find_habit<'a>(data: &'a mut HabitSet, id: &str) -> Result<&'a mut Habit, AppError> {
    data.habits
        .iter_mut()
        .find(|habit| habit.id == id)
        .ok_or_else(|| habit_not_found(id))
}

fn habit_not_found(id: &str) -> AppError {
    AppError::not_found(format!("habit '{id}' not found"))
}

fn require_user(ns: &Namespace) -> Result<&str, AppError> {
    ns.current_user()
        .ok_or_else(|| AppError::unauthorized("Unauthorized - sign in to sync data"))
}
