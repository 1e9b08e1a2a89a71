use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;

const LOG_FILE_PREFIX: &str = "flashcards.log";

/// Keeps the non-blocking file writer flushing until dropped.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Filter directives for `level`. A bare level such as `debug` also caps
/// sqlx's per-statement logging at `warn`. Full directive strings pass
/// through untouched.
pub fn filter_directives(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        return "info,sqlx::query=warn".to_string();
    }
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    format!("{level},sqlx::query=warn")
}

pub fn init_tracing(config: &LogConfig) -> Option<FileLogGuard> {
    let env_filter = EnvFilter::try_new(filter_directives(&config.level))
        .unwrap_or_else(|_| EnvFilter::new(filter_directives("info")));
    let stdout_layer = fmt::layer().with_target(true);

    let (file_layer, guard) = match config.file_dir.as_deref().map(open_log_dir) {
        Some(Ok(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(FileLogGuard { _guard: guard }))
        }
        Some(Err(err)) => {
            eprintln!("file logging disabled: {err}");
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = config.file_dir.as_deref().filter(|_| guard.is_some()) {
        tracing::info!(log_dir = %dir.display(), prefix = LOG_FILE_PREFIX, "file logging enabled");
    }
    guard
}

fn open_log_dir(dir: &std::path::Path) -> std::io::Result<RollingFileAppender> {
    std::fs::create_dir_all(dir).map_err(|err| {
        std::io::Error::new(err.kind(), format!("cannot create {}: {err}", dir.display()))
    })?;
    Ok(RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX))
}
