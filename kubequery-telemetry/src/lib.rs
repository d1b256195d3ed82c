use opentelemetry_semantic_conventions::{
    resource::{SERVICE_NAME, SERVICE_VERSION},
    SCHEMA_URL,
};
use std::{
    fs::File,
    path::Path,
    sync::{mpsc, OnceLock},
};
use tracing::level_filters::LevelFilter;

use opentelemetry::{trace::TracerProvider, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    trace::{Sampler, SdkTracerProvider},
    Resource,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

const SERVICE: &str = "kubequery";
const LOG_FILE: &str = "kubequery.log";
const LOG_ENV: &str = "KUBEQUERY_LOG";

static SUBSCRIBER_SET: OnceLock<()> = OnceLock::new();
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();
static WORKER_HANDLE: OnceLock<std::thread::JoinHandle<()>> = OnceLock::new();

fn resource() -> Resource {
    Resource::builder()
        .with_schema_url(
            [
                KeyValue::new(SERVICE_NAME, SERVICE),
                KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
            ],
            SCHEMA_URL,
        )
        .with_service_name(SERVICE)
        .build()
}

fn init_tracer_provider(ep: &str) -> Result<SdkTracerProvider, BoxError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(ep)
        .build()?;

    Ok(SdkTracerProvider::builder()
        .with_sampler(Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(
            1.0,
        ))))
        .with_resource(resource())
        .with_batch_exporter(exporter)
        .build())
}

/// The batch exporter needs a runtime of its own, separate from the one
/// generators block on. The worker builds the provider there and hands it
/// back.
fn spawn_exporter(endpoint: &str) -> Result<SdkTracerProvider, BoxError> {
    let (tx, rx) = mpsc::sync_channel(1);
    let endpoint_owned = endpoint.to_owned();

    let handle = std::thread::Builder::new()
        .name("otel-worker".into())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .worker_threads(2)
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    tx.send(Err(e.to_string())).ok();
                    return;
                }
            };

            rt.block_on(async move {
                let provider = init_tracer_provider(&endpoint_owned).map_err(|e| e.to_string());
                tx.send(provider).ok();
                std::future::pending::<()>().await;
            });
        })?;

    let provider = rx.recv()??;
    WORKER_HANDLE.set(handle).ok();
    Ok(provider)
}

/// Same contract as the plain logger, plus span export over OTLP to
/// `endpoint`.
pub fn setup_logger(log_dir: Option<&Path>, endpoint: &str) -> Result<(), BoxError> {
    if SUBSCRIBER_SET.get().is_some() {
        return Ok(());
    }

    let provider = spawn_exporter(endpoint)?;
    TRACER_PROVIDER.set(provider.clone()).ok();
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE));

    let output_layer = match log_dir {
        Some(dir) => {
            let file = File::create(dir.join(LOG_FILE))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            LOG_GUARD.set(guard).ok();
            tracing_subscriber::fmt::layer()
                .with_line_number(true)
                .with_writer(writer)
                .with_filter(LevelFilter::INFO)
                .boxed()
        }
        None => {
            let filter =
                EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter)
                .boxed()
        }
    };

    SUBSCRIBER_SET.get_or_init(|| {
        tracing_subscriber::registry()
            .with(output_layer)
            .with(otel_layer)
            .try_init()
            .ok();
    });

    Ok(())
}

/// Flushes pending spans. Call before process exit.
pub fn shutdown() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("telemetry shutdown failed: {e}");
        }
    }
}
