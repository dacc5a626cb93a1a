use crate::errors::AppError;
use crate::models::HabitSet;
use async_trait::async_trait;
use std::{collections::HashMap, path::PathBuf, sync::Arc};
use tokio::{fs, sync::Mutex};
use tracing::error;

/// Persistence port for a namespace's habits and completion ledger.
#[async_trait]
pub trait HabitStore: Send + Sync {
    /// `Ok(None)` when nothing usable is stored under `key`. Errors mean the
    /// stored data may still exist and must not be overwritten.
    async fn load(&self, key: &str) -> Result<Option<HabitSet>, AppError>;

    async fn save(&self, key: &str, data: &HabitSet) -> Result<(), AppError>;
}

/// One JSON document per namespace under `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn corrupt_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json.corrupt"))
    }
}

#[async_trait]
impl HabitStore for FileStore {
    async fn load(&self, key: &str) -> Result<Option<HabitSet>, AppError> {
        let path = self.path_for(key);
        match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(data) => Ok(Some(data)),
                Err(err) => {
                    let aside = self.corrupt_path_for(key);
                    error!(
                        "failed to parse {}: {err}; moving it to {}",
                        path.display(),
                        aside.display()
                    );
                    fs::rename(&path, &aside).await?;
                    Ok(None)
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => {
                error!("failed to read {}: {err}", path.display());
                Err(err.into())
            }
        }
    }

    async fn save(&self, key: &str, data: &HabitSet) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).await?;
        let payload = serde_json::to_vec_pretty(data)?;
        fs::write(self.path_for(key), payload).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, HabitSet>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HabitStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<HabitSet>, AppError> {
        Ok(self.inner.lock().await.get(key).cloned())
    }

    async fn save(&self, key: &str, data: &HabitSet) -> Result<(), AppError> {
        self.inner.lock().await.insert(key.to_string(), data.clone());
        Ok(())
    }
}
