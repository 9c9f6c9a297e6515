use std::path::Path;

use eyre::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "SCRIPTED_CHAT_LOG";
const LOG_FILE_NAME: &str = "scripted-chat.log";

/// Initializes tracing with a non-blocking file writer.
///
/// The TUI owns the terminal, so logs go to a file under the data directory
/// instead of stderr. The returned guard must be kept alive for the process
/// lifetime or buffered log lines are lost.
pub fn init(log_dir: &Path, default_level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}
