use std::{fs::File, path::Path, sync::OnceLock};

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static TRACER: OnceLock<()> = OnceLock::new();
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE: &str = "kubequery.log";
const LOG_ENV: &str = "KUBEQUERY_LOG";

/// Installs the global subscriber once. With a directory, logs go to
/// `<dir>/kubequery.log` at INFO; without one, to stderr filtered by
/// `KUBEQUERY_LOG`. The endpoint is only used by the telemetry build.
pub fn setup_logger(
    log_dir: Option<&Path>,
    _endpoint: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    if TRACER.get().is_some() {
        return Ok(());
    }

    match log_dir {
        Some(dir) => {
            let file = File::create(dir.join(LOG_FILE))?;
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file);

            let file_layer = fmt::layer()
                .with_line_number(true)
                .with_writer(non_blocking_writer)
                .with_filter(tracing_subscriber::filter::LevelFilter::from_level(Level::INFO));

            LOG_GUARD.set(guard).ok();
            tracing_subscriber::registry().with(file_layer).try_init().ok();
        }
        None => {
            let filter =
                EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
            let stderr_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter);
            tracing_subscriber::registry().with(stderr_layer).try_init().ok();
        }
    }

    TRACER.set(()).ok();
    Ok(())
}

/// Nothing to flush without telemetry; the file writer flushes on exit.
pub fn shutdown() {}
