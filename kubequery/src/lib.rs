//! Live Kubernetes API state as relational tables.
//!
//! A host calls [`init_runtime`] once, then [`table_names`], [`columns`] and
//! [`generate`] as often as it likes. Schemas are reflected from the row
//! records and never touch the cluster; generation pages through the list API
//! and projects every object into flat rows.

use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::Runtime;

cfg_if::cfg_if! {
    if #[cfg(feature = "telemetry")] {
        use kubequery_telemetry as logging;
    } else {
        mod log;
        use log as logging;
    }
}

pub mod cmd;
pub mod errors;
pub mod fields;
pub mod processors;
pub mod projection;
pub mod state;
pub mod structs;

pub use cmd::cluster::BootstrapConfig;
pub use errors::{Error, ProjectionError, Result};
pub use logging::{setup_logger, shutdown};
pub use processors::TableRegistry;
pub use state::ClusterState;
pub use structs::{Column, HostContext, QueryContext, Row, SqlKind};

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// The runtime every blocking entry point drives its futures on.
pub fn runtime() -> Result<&'static Runtime> {
    if let Some(rt) = RUNTIME.get() {
        return Ok(rt);
    }
    let rt = Runtime::new()?;
    Ok(RUNTIME.get_or_init(|| rt))
}

fn block_on<F: Future>(fut: F) -> Result<F::Output> {
    Ok(runtime()?.block_on(fut))
}

/// Connects to the cluster, resolves its uid and installs the process-wide
/// state. A second call fails with [`Error::AlreadyInitialized`].
#[tracing::instrument]
pub fn init_runtime(cfg: &BootstrapConfig) -> Result<()> {
    let state = block_on(ClusterState::connect(cfg))??;
    state::install(state)?;
    Ok(())
}

pub fn table_names() -> Vec<&'static str> {
    processors::table_names()
}

pub fn columns(table: &str) -> Result<Vec<Column>> {
    processors::columns(table)
}

/// Rows for `table`, read fresh from the cluster.
#[tracing::instrument(skip(ctx, query))]
pub fn generate(table: &str, ctx: &HostContext, query: &QueryContext) -> Result<Vec<Row>> {
    // Unknown names fail before the state check so a host gets the more
    // specific error.
    processors::columns(table)?;
    let registry = TableRegistry::new(state::installed()?);
    block_on(registry.generate(table, ctx, query))?
}
