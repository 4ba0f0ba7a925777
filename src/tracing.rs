use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Installs the subscriber and the `log` bridge so the `log::` macros used
/// throughout the crate flow into tracing. When a log file is configured,
/// every line is mirrored to stderr and to the file, so console visibility
/// survives `--log-file`; the returned guard must be held for the lifetime
/// of the process so buffered lines flush.
pub fn init(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let _ = tracing_log::LogTracer::init();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let (writer, guard) = file_writer(path);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr.and(writer))
                .with_ansi(false)
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .try_init();
            None
        }
    }
}

/// Non-blocking appender for the configured log file, creating parent
/// directories as needed.
fn file_writer(path: &Path) -> (NonBlocking, WorkerGuard) {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = dir {
        let _ = std::fs::create_dir_all(dir);
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "catalogue.log".to_string());
    let appender =
        tracing_appender::rolling::never(dir.unwrap_or_else(|| Path::new(".")), file_name);
    tracing_appender::non_blocking(appender)
}
