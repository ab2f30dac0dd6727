use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::ChronoLocal, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::LogConfig;

const LOG_FILE_PREFIX: &str = "cas-task-cleaner.log";

/// Build the filter directive; `debug_log` raises this crate to debug
fn filter_directive(config: &LogConfig, debug_log: bool) -> String {
    if debug_log {
        format!("{},cas_task_cleaner=debug", config.level)
    } else {
        config.level.clone()
    }
}

/// Initialize stdout logging plus an optional daily-rolling file.
///
/// `RUST_LOG` takes precedence over the configured level. Keep the returned
/// guard alive for the lifetime of the process so buffered file logs flush.
pub fn init(config: &LogConfig, debug_log: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let directive = filter_directive(config, debug_log);
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&directive))?;

    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_timer(ChronoLocal::rfc_3339());

    let (file_layer, guard) = match &config.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_timer(ChronoLocal::rfc_3339())
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!(filter = %directive, "Logging initialized");
    Ok(guard)
}
