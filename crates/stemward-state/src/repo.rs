//! Stemcell repository
//!
//! Manages the `<state_dir>/state.json` file which records every uploaded
//! stemcell and the current-stemcell marker.

use crate::error::{Result, StateError};
use crate::lock::StateLock;
use crate::record::{STATE_VERSION, StateFile, StemcellRecord};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

const STATE_FILE: &str = "state.json";
const STATE_BACKUP: &str = "state.json.backup";
const STATE_TMP: &str = "state.json.tmp";
const LOCK_FILE: &str = "lock.json";

/// Query/mutation contract for stemcell records
#[async_trait]
pub trait StemcellRepo: Send + Sync {
    /// The record marked current, if any
    async fn find_current(&self) -> Result<Option<StemcellRecord>>;

    /// The record for `name`/`version`, if any
    async fn find(&self, name: &str, version: &str) -> Result<Option<StemcellRecord>>;

    /// Persist a new record; an existing identity is rejected
    async fn save(&self, name: &str, version: &str, cid: &str) -> Result<StemcellRecord>;

    /// Every record, in store order
    async fn all(&self) -> Result<Vec<StemcellRecord>>;

    /// Remove a record, clearing the current marker if it pointed at it
    async fn delete(&self, record: &StemcellRecord) -> Result<()>;

    /// Mark the record with `record_id` as current
    async fn update_current(&self, record_id: &str) -> Result<()>;

    /// Drop the current marker
    async fn clear_current(&self) -> Result<()>;
}

/// [`StemcellRepo`] persisted as JSON on disk
pub struct JsonStemcellRepo {
    state_dir: PathBuf,
}

impl JsonStemcellRepo {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            state_dir: state_dir.as_ref().to_path_buf(),
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Get the state file path
    pub fn state_path(&self) -> PathBuf {
        self.state_dir.join(STATE_FILE)
    }

    fn backup_path(&self) -> PathBuf {
        self.state_dir.join(STATE_BACKUP)
    }

    fn tmp_path(&self) -> PathBuf {
        self.state_dir.join(STATE_TMP)
    }

    fn lock_path(&self) -> PathBuf {
        self.state_dir.join(LOCK_FILE)
    }

    async fn ensure_state_dir(&self) -> Result<()> {
        if !self.state_dir.exists() {
            fs::create_dir_all(&self.state_dir).await?;
            tracing::debug!("Created state directory: {}", self.state_dir.display());
        }
        Ok(())
    }

    /// Load the state file; a missing file is an empty state
    ///
    /// If only the backup exists, a write was interrupted before the new
    /// state landed and the backup is the last good state.
    pub async fn load(&self) -> Result<StateFile> {
        let path = self.state_path();
        if path.exists() {
            return Self::read_state(&path).await;
        }

        let backup = self.backup_path();
        if backup.exists() {
            tracing::warn!("State file missing, loading backup {}", backup.display());
            return Self::read_state(&backup).await;
        }

        tracing::debug!("State file not found, returning empty state");
        Ok(StateFile::new())
    }

    async fn read_state(path: &Path) -> Result<StateFile> {
        let content = fs::read_to_string(path).await?;
        let state: StateFile = serde_json::from_str(&content)?;

        if state.version > STATE_VERSION {
            return Err(StateError::UnsupportedVersion {
                found: state.version,
                supported: STATE_VERSION,
            });
        }

        tracing::debug!("Loaded state with {} stemcells", state.stemcells.len());
        Ok(state)
    }

    /// Write through a temp file so `state.json` is always a complete state
    async fn write(&self, state: &StateFile) -> Result<()> {
        let path = self.state_path();
        let tmp = self.tmp_path();

        let content = serde_json::to_string_pretty(state)?;
        fs::write(&tmp, content).await?;

        if path.exists() {
            fs::copy(&path, self.backup_path()).await?;
        }
        fs::rename(&tmp, &path).await?;

        tracing::debug!("Saved state with {} stemcells", state.stemcells.len());
        Ok(())
    }

    /// Load, apply `change` and write back while holding the lock
    async fn mutate<T>(&self, change: impl FnOnce(&mut StateFile) -> Result<T>) -> Result<T> {
        self.ensure_state_dir().await?;
        let lock = StateLock::acquire(&self.lock_path()).await?;

        let mut state = self.load().await?;
        let value = change(&mut state)?;
        self.write(&state).await?;

        lock.release().await?;
        Ok(value)
    }
}

#[async_trait]
impl StemcellRepo for JsonStemcellRepo {
    async fn find_current(&self) -> Result<Option<StemcellRecord>> {
        let state = self.load().await?;
        Ok(state.current().cloned())
    }

    async fn find(&self, name: &str, version: &str) -> Result<Option<StemcellRecord>> {
        let state = self.load().await?;
        Ok(state.find(name, version).cloned())
    }

    async fn save(&self, name: &str, version: &str, cid: &str) -> Result<StemcellRecord> {
        if cid.is_empty() {
            return Err(StateError::InvalidRecord(format!(
                "empty cid for {}/{}",
                name, version
            )));
        }

        self.mutate(|state| {
            if state.find(name, version).is_some() {
                return Err(StateError::DuplicateRecord {
                    name: name.to_string(),
                    version: version.to_string(),
                });
            }

            let record = StemcellRecord::new(uuid::Uuid::new_v4().to_string(), name, version, cid);
            state.push(record.clone());
            tracing::debug!("Saved stemcell record {}", record);
            Ok(record)
        })
        .await
    }

    async fn all(&self) -> Result<Vec<StemcellRecord>> {
        let state = self.load().await?;
        Ok(state.stemcells)
    }

    async fn delete(&self, record: &StemcellRecord) -> Result<()> {
        self.mutate(|state| {
            state
                .remove(&record.id)
                .map(|_| ())
                .ok_or_else(|| StateError::RecordNotFound(record.id.clone()))
        })
        .await
    }

    async fn update_current(&self, record_id: &str) -> Result<()> {
        self.mutate(|state| {
            if state.find_by_id(record_id).is_none() {
                return Err(StateError::RecordNotFound(record_id.to_string()));
            }
            state.set_current(Some(record_id.to_string()));
            Ok(())
        })
        .await
    }

    async fn clear_current(&self) -> Result<()> {
        self.mutate(|state| {
            state.set_current(None);
            Ok(())
        })
        .await
    }
}
