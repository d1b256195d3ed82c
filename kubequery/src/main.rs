use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use k8s_openapi::serde_json;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use kubequery::{BootstrapConfig, HostContext, QueryContext};

#[derive(Debug, Parser)]
#[command(name = "kubequery", version, about = "Query Kubernetes API state as tables")]
struct Args {
    /// Kubeconfig context. Defaults to in-cluster config, then the current context.
    #[arg(long, global = true, env = "KUBEQUERY_CONTEXT")]
    context: Option<String>,

    /// Write logs to `<dir>/kubequery.log` instead of stderr.
    #[arg(long, global = true, env = "KUBEQUERY_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// OTLP collector, used by builds with the `telemetry` feature.
    #[arg(
        long,
        global = true,
        env = "OTEL_EXPORTER_OTLP_ENDPOINT",
        default_value = "http://localhost:4317"
    )]
    otlp_endpoint: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List table names.
    Tables,
    /// Print a table's columns and their SQL types.
    Schema { table: String },
    /// Generate a table's rows as a JSON array.
    Query { table: String },
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut out = io::stdout().lock();
    match args.command {
        Command::Tables => {
            for name in kubequery::table_names() {
                writeln!(out, "{name}")?;
            }
        }
        Command::Schema { table } => {
            for column in kubequery::columns(&table)? {
                writeln!(out, "{}\t{}", column.name, column.kind)?;
            }
        }
        Command::Query { table } => {
            // Fail on a bad name before dialing the cluster.
            kubequery::columns(&table)?;
            kubequery::init_runtime(&BootstrapConfig {
                context: args.context,
            })?;

            let token = CancellationToken::new();
            let on_signal = token.clone();
            kubequery::runtime()?.spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("interrupt received, cancelling query");
                    on_signal.cancel();
                }
            });

            let ctx = HostContext::with_token(token);
            let rows = kubequery::generate(&table, &ctx, &QueryContext::default())?;
            serde_json::to_writer_pretty(&mut out, &rows)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = kubequery::setup_logger(args.log_dir.as_deref(), &args.otlp_endpoint) {
        eprintln!("could not set up logging: {e}");
    }

    let code = match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("kubequery: {e}");
            ExitCode::FAILURE
        }
    };

    kubequery::shutdown();
    code
}
