//! Error types for catsync-hive operations.

use thiserror::Error;

/// Result type alias for hook operations.
pub type Result<T> = std::result::Result<T, HookError>;

/// Why an event did not yield a rename to plan.
///
/// Both conditions are benign for a single event: the event is logged and
/// skipped, and unrelated events in the same batch proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RenameError {
    /// The event has no table in its inputs to rename from.
    #[error("old table not found in inputs")]
    NoOldObject,

    /// The event's outputs hold no table that differs from the old one.
    #[error("renamed table not found in outputs")]
    NoNewObject,
}

/// Errors that can occur while handling hook events.
#[derive(Debug, Error)]
pub enum HookError {
    /// Configuration is missing or invalid.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },

    /// A core operation failed (envelope construction, serialization).
    #[error(transparent)]
    Core(#[from] catsync_core::Error),
}

impl HookError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
