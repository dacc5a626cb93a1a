use crate::models::HabitSet;
use crate::storage::HabitStore;
use chrono::NaiveDate;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

/// A namespace's data as currently held in memory.
#[derive(Debug, Clone)]
pub struct Session {
    pub data: HabitSet,
    /// Day the rollover pass last ran for this namespace.
    pub rolled_over_on: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HabitStore>,
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
    pub seed_defaults: bool,
}

impl AppState {
    pub fn new(store: impl HabitStore + 'static, seed_defaults: bool) -> Self {
        Self {
            store: Arc::new(store),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            seed_defaults,
        }
    }
}
