#![forbid(unsafe_code)]

//! Structured logging setup.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! application's choice. With the `tracing-json` feature,
//! [`init_json_logging`] installs a JSON formatter filtered by `RUST_LOG`
//! (falling back to [`DEFAULT_FILTER`]).
//!
//! # Failure Modes
//!
//! | Failure | Cause | Result |
//! |---------|-------|--------|
//! | Subscriber already set | Second init, or host app installed one | `LoggingError::AlreadyInitialized` |
//! | Bad filter directive | Malformed `RUST_LOG` | `LoggingError::InvalidFilter` |

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,popup_runtime=debug,popup_widgets=debug";

/// Errors from logging initialisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    /// A global subscriber is already installed.
    AlreadyInitialized(String),
    /// The filter directive could not be parsed.
    InvalidFilter(String),
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyInitialized(msg) => write!(f, "logging already initialized: {msg}"),
            Self::InvalidFilter(msg) => write!(f, "invalid log filter: {msg}"),
        }
    }
}

impl std::error::Error for LoggingError {}

/// Install a global JSON subscriber.
///
/// Reads `RUST_LOG`; when unset, uses [`DEFAULT_FILTER`].
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => EnvFilter::try_new(directives)
            .map_err(|e| LoggingError::InvalidFilter(e.to_string()))?,
        Err(_) => EnvFilter::new(DEFAULT_FILTER),
    };

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    tracing::debug!(default_filter = DEFAULT_FILTER, "json logging installed");
    Ok(())
}
