use std::fmt::Debug;

use futures::future::BoxFuture;
use futures::FutureExt;
use k8s_openapi::serde_json::{self, from_value, to_value};
use kube::api::{ApiResource, DynamicObject};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::cmd::list::for_each_page;
use crate::errors::{Error, Result};
use crate::projection::{project, schema_of, Record};
use crate::state::ClusterState;
use crate::structs::{Column, HostContext, Row};

/// Turns one listed object of a kind into the rows of one table.
pub trait Processor: Debug + Send + Sync {
    type Resource: kube::Resource<DynamicType = ()> + k8s_openapi::Resource + DeserializeOwned + Send;
    type Row: Record + Default + Send;

    fn table_name(&self) -> &'static str;

    fn build_rows(&self, cluster_uid: &str, obj: &Self::Resource) -> Result<Vec<Self::Row>>;
}

pub fn dynamic_to_typed<K>(obj: DynamicObject) -> Result<K>
where
    K: k8s_openapi::Resource + DeserializeOwned,
{
    let decode = |source: serde_json::Error| Error::Decode {
        kind: K::KIND,
        source,
    };
    from_value(to_value(obj).map_err(decode)?).map_err(decode)
}

/// A registered table as the host sees it.
pub trait Table: Send + Sync {
    fn name(&self) -> &'static str;

    fn columns(&self) -> Vec<Column>;

    fn generate<'a>(
        &'a self,
        state: &'a ClusterState,
        ctx: &'a HostContext,
    ) -> BoxFuture<'a, Result<Vec<Row>>>;
}

impl<P: Processor> Table for P {
    fn name(&self) -> &'static str {
        self.table_name()
    }

    fn columns(&self) -> Vec<Column> {
        schema_of::<P::Row>()
    }

    fn generate<'a>(
        &'a self,
        state: &'a ClusterState,
        ctx: &'a HostContext,
    ) -> BoxFuture<'a, Result<Vec<Row>>> {
        generate_rows(self, state, ctx).boxed()
    }
}

/// Lists every object of the processor's kind and projects it, page by page.
/// Rows keep list order; any failing page or object fails the whole call.
#[tracing::instrument(skip_all, fields(table = processor.table_name()))]
pub async fn generate_rows<P: Processor>(
    processor: &P,
    state: &ClusterState,
    ctx: &HostContext,
) -> Result<Vec<Row>> {
    let resource = ApiResource::erase::<P::Resource>(&());
    let cluster_uid = state.cluster_uid();
    let mut rows: Vec<Row> = Vec::new();

    let pages = for_each_page(state.pager(), &resource, ctx, |items| {
        let projected = items
            .into_par_iter()
            .map(|obj| {
                let typed = dynamic_to_typed::<P::Resource>(obj)?;
                processor
                    .build_rows(cluster_uid, &typed)?
                    .iter()
                    .map(|row| project(row).map_err(Error::from))
                    .collect::<Result<Vec<Row>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        rows.extend(projected.into_iter().flatten());
        Ok(())
    })
    .await?;

    info!(pages, rows = rows.len(), "generated");
    Ok(rows)
}
