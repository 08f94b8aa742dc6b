// File: ./src/store.rs
//! The waiver store: the host capability it sits on, two implementations
//! of it, and the facade the reconciler talks to.
//!
//! Every backend operation touches a single key. There is no multi-key
//! transaction, which is why overlap checks live in the reconciler.
use crate::context::AppContext;
use crate::error::WaiverError;
use crate::model::WaiverRecord;
use crate::storage::LocalStorage;
use anyhow::Result;
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Store operations exposed by the host process.
///
/// `Ok(false)` means the host refused the operation.
#[allow(async_fn_in_trait)]
pub trait WaiverBackend: Send + Sync {
    /// All records with their keys, in the backend's own order.
    async fn get_contents(&self) -> Result<Vec<WaiverRecord>>;
    async fn set_waiver(&self, key: &str, record: &WaiverRecord) -> Result<bool>;
    async fn has_waiver(&self, key: &str) -> Result<bool>;
    async fn delete_waiver(&self, key: &str) -> Result<bool>;
}

/// The "waived-workdays" namespace persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct FileWaiverBackend {
    path: PathBuf,
}

impl FileWaiverBackend {
    pub fn new(ctx: &dyn AppContext) -> Result<Self> {
        Ok(Self {
            path: ctx.get_waiver_store_path()?,
        })
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl WaiverBackend for FileWaiverBackend {
    async fn get_contents(&self) -> Result<Vec<WaiverRecord>> {
        Ok(LocalStorage::load_waivers(&self.path)?.into_values().collect())
    }

    async fn set_waiver(&self, key: &str, record: &WaiverRecord) -> Result<bool> {
        let mut record = record.clone();
        record.key = key.to_string();
        LocalStorage::modify_waivers(&self.path, |map| {
            map.insert(key.to_string(), record);
            true
        })?;
        Ok(true)
    }

    async fn has_waiver(&self, key: &str) -> Result<bool> {
        Ok(LocalStorage::load_waivers(&self.path)?.contains_key(key))
    }

    async fn delete_waiver(&self, key: &str) -> Result<bool> {
        LocalStorage::modify_waivers(&self.path, |map| map.remove(key).is_some())?;
        Ok(true)
    }
}

/// In-process store keeping insertion order.
#[derive(Debug, Default)]
pub struct MemoryWaiverBackend {
    records: Mutex<Vec<WaiverRecord>>,
}

impl MemoryWaiverBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WaiverBackend for MemoryWaiverBackend {
    async fn get_contents(&self) -> Result<Vec<WaiverRecord>> {
        Ok(self.records.lock().await.clone())
    }

    async fn set_waiver(&self, key: &str, record: &WaiverRecord) -> Result<bool> {
        let mut record = record.clone();
        record.key = key.to_string();

        let mut records = self.records.lock().await;
        if let Some(existing) = records.iter_mut().find(|r| r.key == key) {
            *existing = record;
        } else {
            records.push(record);
        }
        Ok(true)
    }

    async fn has_waiver(&self, key: &str) -> Result<bool> {
        Ok(self.records.lock().await.iter().any(|r| r.key == key))
    }

    async fn delete_waiver(&self, key: &str) -> Result<bool> {
        self.records.lock().await.retain(|r| r.key != key);
        Ok(true)
    }
}

/// Facade over a `WaiverBackend` translating host failures into
/// `WaiverError::StoreUnavailable`.
#[derive(Debug)]
pub struct WaiverStore<B> {
    backend: B,
}

impl<B: WaiverBackend> WaiverStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Records in store order. Not sorted; see `presenter`.
    pub async fn list(&self) -> Result<Vec<WaiverRecord>, WaiverError> {
        Ok(self.backend.get_contents().await?)
    }

    pub async fn has(&self, key: &str) -> Result<bool, WaiverError> {
        Ok(self.backend.has_waiver(key).await?)
    }

    pub async fn set(&self, key: &str, record: &WaiverRecord) -> Result<(), WaiverError> {
        if self.backend.set_waiver(key, record).await? {
            log::debug!("Stored waiver {}", key);
            Ok(())
        } else {
            Err(WaiverError::StoreUnavailable(format!(
                "store refused to write {}",
                key
            )))
        }
    }

    /// Deleting an unknown key succeeds without changing anything.
    pub async fn delete(&self, key: &str) -> Result<(), WaiverError> {
        if self.backend.delete_waiver(key).await? {
            log::debug!("Deleted waiver {}", key);
            Ok(())
        } else {
            Err(WaiverError::StoreUnavailable(format!(
                "store refused to delete {}",
                key
            )))
        }
    }

    /// Deletes every record one key at a time. Stops at the first failure;
    /// records deleted before it stay deleted.
    pub async fn clear(&self) -> Result<usize, WaiverError> {
        let records = self.list().await?;
        for record in &records {
            self.delete(&record.key).await?;
        }
        log::info!("Cleared {} waiver(s)", records.len());
        Ok(records.len())
    }
}
