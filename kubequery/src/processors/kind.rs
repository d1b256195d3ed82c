use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::errors::{Error, Result};
use crate::state::ClusterState;
use crate::structs::{Column, HostContext, QueryContext, Row};

use super::{
    cronjob::{CronJobContainerProcessor, CronJobProcessor, CronJobVolumeProcessor},
    daemonset::{DaemonSetContainerProcessor, DaemonSetProcessor, DaemonSetVolumeProcessor},
    deployment::{DeploymentContainerProcessor, DeploymentProcessor, DeploymentVolumeProcessor},
    job::{JobContainerProcessor, JobProcessor, JobVolumeProcessor},
    namespace::NamespaceProcessor,
    node::NodeProcessor,
    pod::{PodContainerProcessor, PodProcessor, PodVolumeProcessor},
    processor::Table,
    replicaset::{ReplicaSetContainerProcessor, ReplicaSetProcessor, ReplicaSetVolumeProcessor},
    statefulset::{
        StatefulSetContainerProcessor, StatefulSetProcessor, StatefulSetVolumeProcessor,
    },
};

fn all_tables() -> Vec<Box<dyn Table>> {
    vec![
        Box::new(DaemonSetProcessor),
        Box::new(DaemonSetContainerProcessor),
        Box::new(DaemonSetVolumeProcessor),
        Box::new(DeploymentProcessor),
        Box::new(DeploymentContainerProcessor),
        Box::new(DeploymentVolumeProcessor),
        Box::new(ReplicaSetProcessor),
        Box::new(ReplicaSetContainerProcessor),
        Box::new(ReplicaSetVolumeProcessor),
        Box::new(StatefulSetProcessor),
        Box::new(StatefulSetContainerProcessor),
        Box::new(StatefulSetVolumeProcessor),
        Box::new(JobProcessor),
        Box::new(JobContainerProcessor),
        Box::new(JobVolumeProcessor),
        Box::new(CronJobProcessor),
        Box::new(CronJobContainerProcessor),
        Box::new(CronJobVolumeProcessor),
        Box::new(PodProcessor),
        Box::new(PodContainerProcessor),
        Box::new(PodVolumeProcessor),
        Box::new(NamespaceProcessor),
        Box::new(NodeProcessor),
    ]
}

struct Registered {
    table: Box<dyn Table>,
    columns: Vec<Column>,
}

static CATALOG: OnceLock<Vec<Registered>> = OnceLock::new();

/// Every table with its schema, reflected once on first use.
fn catalog() -> &'static [Registered] {
    CATALOG.get_or_init(|| {
        all_tables()
            .into_iter()
            .map(|table| {
                let columns = table.columns();
                debug!(table = table.name(), columns = columns.len(), "registered");
                Registered { table, columns }
            })
            .collect()
    })
}

fn lookup(name: &str) -> Result<&'static Registered> {
    catalog()
        .iter()
        .find(|r| r.table.name() == name)
        .ok_or_else(|| Error::UnknownTable(name.to_string()))
}

pub fn table_names() -> Vec<&'static str> {
    catalog().iter().map(|r| r.table.name()).collect()
}

pub fn columns(name: &str) -> Result<Vec<Column>> {
    Ok(lookup(name)?.columns.clone())
}

/// The tables bound to one cluster.
#[derive(Debug, Clone)]
pub struct TableRegistry {
    state: Arc<ClusterState>,
}

impl TableRegistry {
    pub fn new(state: Arc<ClusterState>) -> Self {
        Self { state }
    }

    pub fn table_names(&self) -> Vec<&'static str> {
        table_names()
    }

    pub fn columns(&self, name: &str) -> Result<Vec<Column>> {
        columns(name)
    }

    /// Rows for `name` from the current cluster snapshot. The query context
    /// is accepted for the host's benefit and not interpreted.
    #[tracing::instrument(skip(self, ctx, _query))]
    pub async fn generate(
        &self,
        name: &str,
        ctx: &HostContext,
        _query: &QueryContext,
    ) -> Result<Vec<Row>> {
        lookup(name)?.table.generate(&self.state, ctx).await
    }
}
