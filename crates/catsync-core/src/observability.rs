//! Observability infrastructure for catsync.
//!
//! Structured logging through `tracing`, with one subscriber initializer for
//! hosts and span constructors for consistent fields across planning calls.

use std::sync::Once;

use serde::{Deserialize, Serialize};
use tracing::Span;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON structured logs (for production).
    Json,
    /// Pretty-printed logs (for development).
    #[default]
    Pretty,
}

impl LogFormat {
    /// Parses a format name (`json` or `pretty`, case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Initializes the logging subsystem.
///
/// Call once at host startup. Safe to call multiple times;
/// subsequent calls are no-ops.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Controls log levels (e.g., `info`, `catsync_hive=debug`)
///
/// # Example
///
/// ```rust
/// use catsync_core::observability::{init_logging, LogFormat};
///
/// init_logging(LogFormat::Pretty);
/// ```
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        // try_init: a host may already have installed a global subscriber.
        let result = match format {
            LogFormat::Json => tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .try_init(),
        };
        if result.is_err() {
            tracing::debug!("Global subscriber already installed; keeping it");
        }
    });
}

/// Creates the span for planning one rename.
///
/// # Example
///
/// ```rust
/// use catsync_core::observability::rename_span;
///
/// let span = rename_span("sales.orders@primary", "sales.orders_v2@primary");
/// let _guard = span.enter();
/// // ... plan the rename
/// ```
#[must_use]
pub fn rename_span(old_qualified_name: &str, new_qualified_name: &str) -> Span {
    tracing::info_span!(
        "rename",
        old_table = old_qualified_name,
        new_table = new_qualified_name,
    )
}

/// Creates the span for handling one hook event.
#[must_use]
pub fn hook_span(operation: &str, user: &str) -> Span {
    tracing::info_span!("hook", op = operation, user = user)
}
