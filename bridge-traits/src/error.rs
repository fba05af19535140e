use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Returns `true` when the failure came from the host refusing to persist
    /// more data.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, BridgeError::QuotaExceeded(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
