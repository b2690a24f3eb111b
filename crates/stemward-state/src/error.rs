//! Record store error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("Stemcell record already exists: {name}/{version}")]
    DuplicateRecord { name: String, version: String },

    #[error("Stemcell record not found: {0}")]
    RecordNotFound(String),

    #[error("Invalid stemcell record: {0}")]
    InvalidRecord(String),

    #[error("Unsupported state file version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StateError>;
