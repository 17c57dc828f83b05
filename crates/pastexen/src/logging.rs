//! Logging setup: compact text on stderr plus a daily JSON file.
//!
//! `RUST_LOG` overrides the default filter. The file lives under the
//! platform's local data dir (`.../logs/pastexen.YYYY-MM-DD.log`).

use directories::ProjectDirs;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "pastexen=debug,pastexen_core=debug";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process. `None` means file logging is unavailable.
pub fn init() -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let appender = log_dir().and_then(|dir| {
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("pastexen")
            .filename_suffix("log")
            .build(dir)
            .ok()
    });

    let (file_layer, guard) = match appender {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if guard.is_none() {
        tracing::warn!("Log directory unavailable, logging to stderr only");
    }

    guard
}

fn log_dir() -> Option<std::path::PathBuf> {
    ProjectDirs::from("com", "pastexen", "Pastexen").map(|dirs| dirs.data_local_dir().join("logs"))
}
