use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    #[error("Malformed persisted data: {0}")]
    MalformedData(String),
}

impl LibraryError {
    /// Whether the store rejected a write for lack of space.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, LibraryError::Bridge(err) if err.is_quota_exceeded())
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
