//! Structured logging setup
//!
//! Two outputs:
//! - **Compact to stderr** - human-readable, always on
//! - **JSONL to file** - optional, one JSON object per event
//!
//! # Usage
//!
//! ```rust,ignore
//! use abbrev_bridge::{config::LoggingConfig, logging};
//!
//! // Keep the guard alive for the duration of the program
//! let _guard = logging::init(&LoggingConfig::default());
//!
//! tracing::info!(syntax = "html", "Expanded abbreviation");
//! ```
//!
//! # JSONL Output Format
//!
//! ```json
//! {"timestamp":"2026-01-05T10:30:45.123Z","level":"INFO","target":"abbrev_bridge::expand_manager","fields":{"message":"Inserted expansion","replace_start":11}}
//! ```

use std::fs::{self, OpenOptions};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Guard that must be kept alive for the duration of the program.
/// Dropping it flushes and closes the JSONL file, if one is open.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize logging.
///
/// `RUST_LOG` overrides the configured filter. Calling this twice is
/// harmless; the second subscriber is discarded.
pub fn init(config: &LoggingConfig) -> LoggingGuard {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.get_filter()));

    let (json_layer, file_guard) = match config.get_jsonl_path() {
        Some(path) => match open_log_file(&path) {
            Ok(file) => {
                let (writer, guard) = tracing_appender::non_blocking(file);
                let layer = fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_span_events(FmtSpan::NONE);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!("[LOGGING] Failed to open {}: {}", path.display(), e);
                (None, None)
            }
        },
        None => (None, None),
    };

    // stderr keeps stdout clean for CLI output
    let pretty_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .compact();

    let initialized = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .is_ok();

    if initialized {
        tracing::debug!(
            event_type = "logging",
            jsonl = file_guard.is_some(),
            "Logging initialized"
        );
    }

    LoggingGuard {
        _file_guard: file_guard,
    }
}

fn open_log_file(path: &Path) -> std::io::Result<fs::File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
