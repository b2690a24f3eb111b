//! Cloud driver error types

use thiserror::Error;

/// Cloud driver errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Stemcell not found: {0}")]
    StemcellNotFound(String),

    #[error("CPI error ({error_type}): {message}")]
    CpiError {
        error_type: String,
        message: String,
        ok_to_retry: bool,
    },

    #[error("CPI command failed: {0}")]
    CommandFailed(String),

    #[error("Cloud returned an empty stemcell CID")]
    EmptyCid,

    #[error("Invalid CPI response: {0}")]
    InvalidResponse(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    /// Whether the driver reported the stemcell as already absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, CloudError::StemcellNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
