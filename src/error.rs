use thiserror::Error;
use tracing::{error, warn};

use crate::engine::EngineError;

/// Error severity, used to pick how loudly a failure is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,    // nothing to do, expected in normal use
    Warning, // recoverable, operation degraded to a no-op
    Error,   // operation failed
}

/// Domain-specific errors for the abbreviation bridge
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Abbreviation expansion failed: {0}")]
    Engine(#[from] EngineError),

    #[error("Nothing to operate on: {0}")]
    NoContext(String),

    #[error("Invalid range {start}..{end} for text of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Failed to read configuration from '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl BridgeError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Engine(_) => ErrorSeverity::Warning,
            Self::NoContext(_) => ErrorSeverity::Info,
            Self::InvalidRange { .. } => ErrorSeverity::Error,
            Self::Config(_) => ErrorSeverity::Warning,
            Self::ConfigParse(_) => ErrorSeverity::Warning,
            Self::ConfigRead { .. } => ErrorSeverity::Warning,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Engine(e) => format!("Could not expand abbreviation: {}", e),
            Self::NoContext(what) => format!("Nothing to do: {}", what),
            Self::InvalidRange { start, end, .. } => {
                format!("Range {}..{} is outside the document", start, end)
            }
            Self::Config(msg) => format!("Configuration issue: {}", msg),
            Self::ConfigParse(e) => format!("Invalid configuration format: {}", e),
            Self::ConfigRead { path, .. } => format!("Could not read configuration from {}", path),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Extension trait that turns a failed operation into a logged no-op.
///
/// Every "fail soft" path in the bridge goes through this: the error is
/// logged with the caller's file/line and the caller receives `None`.
///
/// ```ignore
/// use abbrev_bridge::error::ResultExt;
///
/// let expanded = engine.expand(&request).warn_on_err().unwrap_or_default();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_levels() {
        let engine_err = BridgeError::Engine(EngineError::Syntax("ul>".into()));
        assert_eq!(engine_err.severity(), ErrorSeverity::Warning);

        let no_context = BridgeError::NoContext("no tag pair".into());
        assert_eq!(no_context.severity(), ErrorSeverity::Info);

        let range = BridgeError::InvalidRange {
            start: 4,
            end: 2,
            len: 10,
        };
        assert_eq!(range.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_user_messages() {
        let err = BridgeError::NoContext("no tag pair at caret".into());
        assert_eq!(err.user_message(), "Nothing to do: no tag pair at caret");

        let err = BridgeError::InvalidRange {
            start: 3,
            end: 40,
            len: 10,
        };
        assert_eq!(err.user_message(), "Range 3..40 is outside the document");
    }

    #[test]
    fn test_engine_error_converts() {
        fn fails() -> Result<()> {
            Err(EngineError::Syntax("a>>b".into()))?
        }
        assert!(matches!(fails(), Err(BridgeError::Engine(_))));
    }

    #[test]
    fn test_result_ext_log_err() {
        let ok: std::result::Result<i32, &str> = Ok(42);
        assert_eq!(ok.log_err(), Some(42));

        let err: std::result::Result<i32, &str> = Err("failed");
        assert_eq!(err.log_err(), None);
    }

    #[test]
    fn test_result_ext_warn_on_err() {
        let ok: std::result::Result<&str, String> = Ok("value");
        assert_eq!(ok.warn_on_err(), Some("value"));

        let err: std::result::Result<&str, String> = Err("oops".to_string());
        assert_eq!(err.warn_on_err(), None);
    }
}
