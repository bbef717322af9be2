//! Rolling Logger
//!
//! Installs a `tracing` subscriber that writes to stderr and to a daily
//! rolling file. `log` records emitted through the `log` facade are bridged
//! into the same subscriber, so both macro families end up in one place.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt as tfmt, EnvFilter};

/// Number of rotated files kept in the log directory
pub const MAX_LOG_FILES: usize = 7;

/// Environment variable read for the filter directive
pub const FILTER_ENV: &str = "PACKLIST_LOG";

/// Keeps the background file writer alive; dropping it flushes pending lines.
pub struct LoggerGuard {
    _file: WorkerGuard,
}

/// Wall-clock timestamps in local time, millisecond precision
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Build the rolling appender for `app_name` inside `log_dir`.
///
/// Files are named `<app_name>.<date>.log`; at most [`MAX_LOG_FILES`] are kept.
pub fn file_appender(log_dir: &Path, app_name: &str) -> Result<RollingFileAppender, String> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| format!("Failed to create log dir {}: {}", log_dir.display(), e))?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(app_name)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(log_dir)
        .map_err(|e| format!("Failed to create log file appender: {}", e))
}

/// Initialize the global logger.
///
/// The filter comes from `PACKLIST_LOG` (e.g. `debug`, `packlist_lib=trace`)
/// and defaults to `info`. Fails if a global subscriber is already set.
pub fn init_logger(log_dir: impl Into<PathBuf>, app_name: &str) -> Result<LoggerGuard, String> {
    let log_dir = log_dir.into();
    let appender = file_appender(&log_dir, app_name)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tfmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(LocalTime)
                .with_target(false),
        )
        .with(
            tfmt::layer()
                .with_writer(file_writer)
                .with_timer(LocalTime)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))?;

    log::info!("[{}] logging to {}", app_name, log_dir.display());

    Ok(LoggerGuard { _file: guard })
}

pub fn info(msg: &str) -> Result<(), String> {
    tracing::info!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    tracing::error!("{}", msg);
    Ok(())
}
