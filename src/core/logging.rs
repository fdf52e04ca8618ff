use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_FILTER: &str = "vision_chat_core=info,tower_http=info";
const LOG_FILE_NAME: &str = "vision-chat.log";

/// Keeps the file appender worker alive; hold it for the life of the process.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber: stdout always, plus a daily rolling file when `log_dir` is set.
pub fn init_tracing(log_dir: Option<&Path>) -> LogGuard {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let mut layers = vec![tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .boxed()];

    let mut file_guard = None;
    if let Some(dir) = log_dir {
        match std::fs::create_dir_all(dir) {
            Ok(()) => {
                let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_NAME);
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                file_guard = Some(guard);

                layers.push(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(non_blocking)
                        .boxed(),
                );
            }
            Err(e) => eprintln!("Failed to create log directory {}: {}", dir.display(), e),
        }
    }

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
    {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }

    LogGuard {
        _file_guard: file_guard,
    }
}
