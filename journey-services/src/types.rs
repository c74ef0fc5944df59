//! Error types for the journey services.

use liberation::{JourneyStage, LiberationError};

/// Error types for journey services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Core engine error
    #[error("Liberation error: {0}")]
    Liberation(#[from] LiberationError),

    /// History store error
    #[error("History store error: {0}")]
    HistoryStore(String),

    /// Request failed basic checks
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Transition requested from a stage the user is not in
    #[error("Stage mismatch: user is in {current}, request starts from {requested}")]
    StageMismatch {
        current: JourneyStage,
        requested: JourneyStage,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Reject blank user identifiers before they reach the history store.
pub(crate) fn require_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(ServiceError::InvalidRequest("user_id must not be empty".to_string()));
    }
    Ok(())
}
