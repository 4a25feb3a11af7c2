//! Console and file logging setup

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Local};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing with a compact console layer at the configured
/// level (RUST_LOG overrides it, unknown level names mean info) and,
/// when a directory is given, a per-run file that always receives
/// trace-level output.
///
/// Returns the guard keeping the file writer alive; hold it for the
/// process lifetime. Falls back to console-only logging if the log
/// directory cannot be created.
pub fn init(log_level: &str, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let (level, level_unknown) = console_level(log_level);
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let guard = install(console_filter, log_dir);
    if level_unknown {
        warn!("Unknown LOG_LEVEL '{}', using 'info'", log_level);
    }
    guard
}

/// Console level for a configured name. Accepts the tracing level
/// names plus the aliases "warning", "critical" and "fatal"; anything
/// else means info, reported through the second value.
fn console_level(log_level: &str) -> (LevelFilter, bool) {
    match log_level {
        "warning" => (LevelFilter::WARN, false),
        "critical" | "fatal" => (LevelFilter::ERROR, false),
        _ => match LevelFilter::from_str(log_level) {
            Ok(level) => (level, false),
            Err(_) => (LevelFilter::INFO, true),
        },
    }
}

fn install(console_filter: EnvFilter, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(fmt::layer().compact().with_filter(console_filter))
            .init();
        return None;
    };

    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!(
            "warn: could not create log directory '{}': {} - falling back to console only",
            dir.display(),
            e
        );
        tracing_subscriber::registry()
            .with(fmt::layer().compact().with_filter(console_filter))
            .init();
        return None;
    }

    let file_name = log_file_name(Local::now());
    let appender = tracing_appender::rolling::never(dir, &file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_filter(console_filter))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_filter(LevelFilter::TRACE),
        )
        .init();

    info!("Logging to file: {}", dir.join(file_name).display());
    Some(guard)
}

/// Per-run log file name, second resolution.
fn log_file_name(now: DateTime<Local>) -> String {
    format!("noip_automation_{}.log", now.format("%Y-%m-%d_%H-%M-%S"))
}
