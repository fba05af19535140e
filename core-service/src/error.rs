use bridge_traits::BridgeError;
use core_library::LibraryError;
use core_playback::PlaybackError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Library(LibraryError::NotFound { .. }))
    }

    pub fn is_quota_exceeded(&self) -> bool {
        match self {
            ServiceError::Library(err) => err.is_quota_exceeded(),
            ServiceError::Bridge(err) => err.is_quota_exceeded(),
            _ => false,
        }
    }

    pub fn is_stale_source(&self) -> bool {
        matches!(self, ServiceError::Playback(err) if err.is_stale_source())
    }

    /// Stable name for hosts that branch on error kind.
    pub fn kind(&self) -> &'static str {
        if self.is_not_found() {
            "NotFoundError"
        } else if self.is_quota_exceeded() {
            "QuotaExceededError"
        } else if self.is_stale_source() {
            "SourceUnavailableError"
        } else {
            match self {
                ServiceError::Library(LibraryError::InvalidInput { .. }) => "InvalidInputError",
                ServiceError::Playback(PlaybackError::NoTrackLoaded) => "NoTrackLoadedError",
                ServiceError::Config(_) => "ConfigError",
                _ => "Error",
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let not_found: ServiceError = LibraryError::NotFound {
            entity_type: "Playlist".to_string(),
            id: "x".to_string(),
        }
        .into();
        assert!(not_found.is_not_found());
        assert_eq!(not_found.kind(), "NotFoundError");

        let quota: ServiceError =
            LibraryError::from(BridgeError::QuotaExceeded("full".to_string())).into();
        assert!(quota.is_quota_exceeded());
        assert_eq!(quota.kind(), "QuotaExceededError");

        let stale: ServiceError = PlaybackError::SourceUnavailable("blob:gone".to_string()).into();
        assert_eq!(stale.kind(), "SourceUnavailableError");

        let other: ServiceError = BridgeError::OperationFailed("boom".to_string()).into();
        assert_eq!(other.kind(), "Error");
    }
}
