#![forbid(unsafe_code)]

//! Logging bootstrap.
//!
//! Engine crates emit structured events through `tracing` directly. This
//! module gives hosts two conveniences:
//!
//! - With the `tracing` feature, the `tracing` macros are re-exported so a
//!   host can log through `tilegrid_core::debug!` without its own dependency.
//! - With the `tracing-json` feature, [`init_json_logging`] installs a global
//!   JSON subscriber filtered by `RUST_LOG` (or a fallback directive).

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Failure to install the global JSON subscriber.
#[cfg(feature = "tracing-json")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingInitError {
    /// The fallback filter directive did not parse.
    InvalidDirective { directive: String, message: String },
    /// A global subscriber was already installed.
    AlreadyInitialized(String),
}

#[cfg(feature = "tracing-json")]
impl std::fmt::Display for LoggingInitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDirective { directive, message } => {
                write!(f, "invalid log filter directive {directive:?}: {message}")
            }
            Self::AlreadyInitialized(message) => {
                write!(f, "global subscriber already installed: {message}")
            }
        }
    }
}

#[cfg(feature = "tracing-json")]
impl std::error::Error for LoggingInitError {}

/// Install a JSON-formatting global subscriber.
///
/// `RUST_LOG` wins when set and valid; otherwise `fallback_directive`
/// (for example `"tilegrid_layout=debug"`) is used.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging(fallback_directive: &str) -> Result<(), LoggingInitError> {
    use tracing_subscriber::EnvFilter;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(fallback_directive).map_err(|error| {
            LoggingInitError::InvalidDirective {
                directive: fallback_directive.to_string(),
                message: error.to_string(),
            }
        })?,
    };

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|error| LoggingInitError::AlreadyInitialized(error.to_string()))
}
