//! Lock file guarding state mutations

use crate::error::{Result, StateError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Locks older than this are considered abandoned
const STALE_LOCK_HOURS: i64 = 1;

/// Lock information
#[derive(Debug, Serialize, Deserialize)]
struct LockInfo {
    holder: String,
    acquired_at: DateTime<Utc>,
}

/// RAII guard for the state lock
pub struct StateLock {
    lock_path: PathBuf,
    released: bool,
}

impl StateLock {
    /// Acquire the lock at `lock_path`, replacing a stale one
    pub async fn acquire(lock_path: &Path) -> Result<Self> {
        match Self::try_create(lock_path).await {
            Ok(lock) => return Ok(lock),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.into()),
        }

        Self::check_stale(lock_path).await?;
        match fs::remove_file(lock_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        // another process may have won the lock since the stale check
        Self::try_create(lock_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                StateError::LockError("State lock was taken by another process".to_string())
            } else {
                e.into()
            }
        })
    }

    /// Atomically create the lock file, failing if it already exists
    async fn try_create(lock_path: &Path) -> std::io::Result<Self> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(lock_path)
            .await?;

        let lock = Self {
            lock_path: lock_path.to_path_buf(),
            released: false,
        };

        let lock_info = LockInfo {
            holder: std::env::var("HOSTNAME")
                .or_else(|_| std::env::var("HOST"))
                .unwrap_or_else(|_| "unknown".to_string()),
            acquired_at: Utc::now(),
        };
        let content = serde_json::to_vec_pretty(&lock_info)?;
        file.write_all(&content).await?;
        file.flush().await?;

        tracing::debug!("Acquired state lock");
        Ok(lock)
    }

    /// Ok if the existing lock is old enough to replace, or already gone
    async fn check_stale(lock_path: &Path) -> Result<()> {
        let content = match fs::read_to_string(lock_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<LockInfo>(&content) {
            Ok(lock_info) => {
                let age = Utc::now().signed_duration_since(lock_info.acquired_at);
                if age.num_hours() < STALE_LOCK_HOURS {
                    return Err(StateError::LockError(format!(
                        "State is locked by {} since {}",
                        lock_info.holder, lock_info.acquired_at
                    )));
                }
                tracing::warn!("Removing stale lock from {}", lock_info.holder);
            }
            Err(_) => {
                // a lock still being written has no content yet; fall back to its mtime
                let metadata = match fs::metadata(lock_path).await {
                    Ok(metadata) => metadata,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
                    Err(e) => return Err(e.into()),
                };
                let modified: DateTime<Utc> = metadata.modified()?.into();
                let age = Utc::now().signed_duration_since(modified);
                if age.num_hours() < STALE_LOCK_HOURS {
                    return Err(StateError::LockError(format!(
                        "State is locked (lock file {} is being written)",
                        lock_path.display()
                    )));
                }
                tracing::warn!("Removing stale unreadable lock file {}", lock_path.display());
            }
        }
        Ok(())
    }

    /// Release the lock
    pub async fn release(mut self) -> Result<()> {
        if !self.released {
            if self.lock_path.exists() {
                fs::remove_file(&self.lock_path).await?;
                tracing::debug!("Released state lock");
            }
            self.released = true;
        }
        Ok(())
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if !self.released && self.lock_path.exists() {
            let _ = std::fs::remove_file(&self.lock_path);
        }
    }
}
