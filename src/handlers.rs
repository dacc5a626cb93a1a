use crate::errors::AppError;
use crate::identity::Identity;
use crate::models::{
    Habit, HabitRequest, HabitSet, MessageResponse, MonthlyRecap, ProgressPoint, RecapQuery,
    TodaySummary,
};
use crate::recap::{month_start, parse_month};
use crate::state::AppState;
use crate::tracker;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{Local, NaiveDate, Utc};

pub async fn list_habits(
    State(state): State<AppState>,
    Identity(ns): Identity,
) -> Result<Json<Vec<Habit>>, AppError> {
    Ok(Json(tracker::list_habits(&state, &ns, today()).await?))
}

pub async fn create_habit(
    State(state): State<AppState>,
    Identity(ns): Identity,
    Json(payload): Json<HabitRequest>,
) -> Result<(StatusCode, Json<Habit>), AppError> {
    let habit = tracker::create_habit(&state, &ns, &payload, today(), Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn edit_habit(
    State(state): State<AppState>,
    Identity(ns): Identity,
    Path(id): Path<String>,
    Json(payload): Json<HabitRequest>,
) -> Result<Json<Habit>, AppError> {
    Ok(Json(tracker::edit_habit(&state, &ns, &id, &payload, today()).await?))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Identity(ns): Identity,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    tracker::delete_habit(&state, &ns, &id, today()).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_habit(
    State(state): State<AppState>,
    Identity(ns): Identity,
    Path(id): Path<String>,
) -> Result<Json<Habit>, AppError> {
    Ok(Json(tracker::toggle_habit(&state, &ns, &id, today()).await?))
}

pub async fn get_today(
    State(state): State<AppState>,
    Identity(ns): Identity,
) -> Result<Json<TodaySummary>, AppError> {
    Ok(Json(tracker::today_summary(&state, &ns, today()).await?))
}

pub async fn get_progress(
    State(state): State<AppState>,
    Identity(ns): Identity,
) -> Result<Json<Vec<ProgressPoint>>, AppError> {
    Ok(Json(tracker::progress(&state, &ns, today()).await?))
}

pub async fn get_recap(
    State(state): State<AppState>,
    Identity(ns): Identity,
    Query(query): Query<RecapQuery>,
) -> Result<Json<MonthlyRecap>, AppError> {
    let today = today();
    let month = match query.month.as_deref() {
        Some(value) if !value.trim().is_empty() => parse_month(value)?,
        _ => month_start(today),
    };
    Ok(Json(tracker::monthly_recap(&state, &ns, month, today).await?))
}

pub async fn get_user_data(
    State(state): State<AppState>,
    Identity(ns): Identity,
) -> Result<Json<HabitSet>, AppError> {
    Ok(Json(tracker::export_data(&state, &ns, today()).await?))
}

pub async fn save_user_data(
    State(state): State<AppState>,
    Identity(ns): Identity,
    Json(payload): Json<HabitSet>,
) -> Result<Json<MessageResponse>, AppError> {
    tracker::import_data(&state, &ns, payload, today()).await?;
    Ok(Json(MessageResponse {
        message: "Data saved successfully".to_string(),
    }))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
