use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/habits",
            get(handlers::list_habits).post(handlers::create_habit),
        )
        .route(
            "/api/habits/:id",
            put(handlers::edit_habit).delete(handlers::delete_habit),
        )
        .route("/api/habits/:id/toggle", post(handlers::toggle_habit))
        .route("/api/today", get(handlers::get_today))
        .route("/api/progress", get(handlers::get_progress))
        .route("/api/recap", get(handlers::get_recap))
        .route(
            "/api/user-data",
            get(handlers::get_user_data).post(handlers::save_user_data),
        )
        .with_state(state)
}
