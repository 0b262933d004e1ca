//! Error types for the intake assistant.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Profile store errors.
///
/// "Not found" is not an error: `ProfileStore::get` returns `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Profile store unavailable: {0}")]
    Unavailable(String),

    #[error("Profile {id} already exists")]
    Conflict { id: String },

    #[error("Migration failed: {0}")]
    Migration(String),
}

/// Channel-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel {name} failed to start: {reason}")]
    StartupFailed { name: String, reason: String },

    #[error("Channel {name} disconnected: {reason}")]
    Disconnected { name: String, reason: String },

    #[error("Failed to send on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },

    #[error("Invalid message format: {0}")]
    InvalidMessage(String),
}

/// Errors raised by a single action invocation.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Missing required field: {field}")]
    Validation { field: String },

    #[error("Profile {id} already exists")]
    Conflict { id: String },

    #[error("Profile store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid parameters for action {name}: {reason}")]
    InvalidParameters { name: String, reason: String },

    #[error("Unknown action: {name}")]
    UnknownAction { name: String },
}

impl From<StoreError> for ActionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { id } => Self::Conflict { id },
            StoreError::Unavailable(reason) | StoreError::Migration(reason) => {
                Self::StoreUnavailable(reason)
            }
        }
    }
}

/// Result type alias for the assistant.
pub type Result<T> = std::result::Result<T, Error>;
