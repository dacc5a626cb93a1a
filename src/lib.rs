pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod recap;
pub mod state;
pub mod storage;
pub mod streak;
pub mod tracker;
pub mod validation;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{FileStore, HabitStore, MemoryStore};
pub use streak::{daily_rollover, toggle_completion};
