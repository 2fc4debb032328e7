use crate::errors::AppError;
use crate::models::MonthData;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{error, warn};

/// Durable home of the whole [`MonthData`] collection.
///
/// `load` never fails: missing or unreadable state comes back empty.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn load(&self) -> MonthData;
    async fn save(&self, data: &MonthData) -> Result<(), AppError>;
}

pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn corrupt_path(&self) -> PathBuf {
        self.path.with_extension("json.corrupt")
    }

    /// Moves an unparseable file out of the way so the next save cannot clobber it.
    async fn set_aside(&self) {
        let target = self.corrupt_path();
        match fs::rename(&self.path, &target).await {
            Ok(()) => warn!("moved unreadable data file to {}", target.display()),
            Err(err) => error!("failed to move {} aside: {err}", self.path.display()),
        }
    }
}

#[async_trait]
impl StorageBackend for JsonFileBackend {
    async fn load(&self) -> MonthData {
        let mut data = match fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice::<MonthData>(&bytes) {
                Ok(data) => data,
                Err(err) => {
                    error!("failed to parse data file {}: {err}", self.path.display());
                    self.set_aside().await;
                    MonthData::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => MonthData::default(),
            Err(err) => {
                error!("failed to read data file {}: {err}", self.path.display());
                MonthData::default()
            }
        };
        data.normalize();
        data
    }

    async fn save(&self, data: &MonthData) -> Result<(), AppError> {
        let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, payload).await?;
        if let Err(err) = fs::rename(&tmp, &self.path).await {
            warn!("failed to move {} into place: {err}", tmp.display());
            return Err(err.into());
        }
        Ok(())
    }
}

/// In-process backend; keeps the last saved snapshot.
#[derive(Default)]
pub struct MemoryBackend {
    data: Mutex<MonthData>,
}

impl MemoryBackend {
    pub fn new(data: MonthData) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }

    pub async fn snapshot(&self) -> MonthData {
        self.data.lock().await.clone()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn load(&self) -> MonthData {
        let mut data = self.data.lock().await.clone();
        data.normalize();
        data
    }

    async fn save(&self, data: &MonthData) -> Result<(), AppError> {
        *self.data.lock().await = data.clone();
        Ok(())
    }
}
