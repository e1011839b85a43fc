//! File logging for the embedding UI.
//!
//! The core only emits `tracing` events; the process owner installs the
//! subscriber.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Installs a global subscriber writing to `dir/file_name`.
///
/// Level filtering follows `RUST_LOG` and defaults to `info`. Keep the
/// returned guard alive for as long as logs should be flushed.
pub fn init_file_logging(dir: &Path, file_name: &str) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install subscriber: {}", e))?;

    Ok(guard)
}
