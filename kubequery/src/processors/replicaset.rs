use k8s_openapi::api::apps::v1::{ReplicaSet, ReplicaSetCondition};
use k8s_openapi::api::core::v1::PodSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;

use crate::errors::Result;
use crate::fields::{
    namespaced_meta, pod_containers, pod_summary, pod_volumes, ContainerSummary, NamespacedMeta,
    PodSummary, VolumeSummary,
};
use crate::processors::processor::Processor;
use crate::record;

record! {
    #[derive(Debug, Clone, Default)]
    pub struct ReplicaSetRow {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub pod: PodSummary,
        pub replicas: i32,
        pub fully_labeled_replicas: i32,
        pub ready_replicas: i32,
        pub available_replicas: i32,
        pub observed_generation: i64,
        pub conditions: Option<Vec<ReplicaSetCondition>>,
        pub replica_set_replicas: Option<i32>,
        pub min_ready_seconds: i32,
        pub selector: Option<LabelSelector>,
    }
}

record! {
    #[derive(Debug, Clone, Default)]
    pub struct ReplicaSetContainer {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub container: ContainerSummary,
        pub replica_set_name: String,
        pub container_type: String,
    }
}

record! {
    #[derive(Debug, Clone, Default)]
    pub struct ReplicaSetVolume {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub volume: VolumeSummary,
        pub replica_set_name: String,
    }
}

/// Replica sets may omit their template entirely.
fn template_spec(rs: &ReplicaSet) -> Option<&PodSpec> {
    rs.spec
        .as_ref()
        .and_then(|s| s.template.as_ref())
        .and_then(|tpl| tpl.spec.as_ref())
}

#[derive(Debug, Clone)]
pub struct ReplicaSetProcessor;

impl Processor for ReplicaSetProcessor {
    type Resource = ReplicaSet;
    type Row = ReplicaSetRow;

    fn table_name(&self) -> &'static str {
        "replica_sets"
    }

    fn build_rows(&self, cluster_uid: &str, rs: &ReplicaSet) -> Result<Vec<Self::Row>> {
        let spec = rs.spec.as_ref();
        let status = rs.status.as_ref();

        Ok(vec![ReplicaSetRow {
            meta: namespaced_meta(cluster_uid, &rs.metadata),
            pod: pod_summary(template_spec(rs)),
            replicas: status.map(|s| s.replicas).unwrap_or(0),
            fully_labeled_replicas: status.and_then(|s| s.fully_labeled_replicas).unwrap_or(0),
            ready_replicas: status.and_then(|s| s.ready_replicas).unwrap_or(0),
            available_replicas: status.and_then(|s| s.available_replicas).unwrap_or(0),
            observed_generation: status.and_then(|s| s.observed_generation).unwrap_or(0),
            conditions: status.and_then(|s| s.conditions.clone()),
            replica_set_replicas: spec.and_then(|s| s.replicas),
            min_ready_seconds: spec.and_then(|s| s.min_ready_seconds).unwrap_or(0),
            selector: spec.map(|s| s.selector.clone()),
        }])
    }
}

#[derive(Debug, Clone)]
pub struct ReplicaSetContainerProcessor;

impl Processor for ReplicaSetContainerProcessor {
    type Resource = ReplicaSet;
    type Row = ReplicaSetContainer;

    fn table_name(&self) -> &'static str {
        "replica_set_containers"
    }

    fn build_rows(&self, cluster_uid: &str, rs: &ReplicaSet) -> Result<Vec<Self::Row>> {
        let meta = namespaced_meta(cluster_uid, &rs.metadata);
        let parent = rs.metadata.name.clone().unwrap_or_default();

        Ok(pod_containers(template_spec(rs))
            .into_iter()
            .map(|(container_type, container)| ReplicaSetContainer {
                meta: meta.renamed(&container.name),
                replica_set_name: parent.clone(),
                container_type: container_type.to_string(),
                container,
            })
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct ReplicaSetVolumeProcessor;

impl Processor for ReplicaSetVolumeProcessor {
    type Resource = ReplicaSet;
    type Row = ReplicaSetVolume;

    fn table_name(&self) -> &'static str {
        "replica_set_volumes"
    }

    fn build_rows(&self, cluster_uid: &str, rs: &ReplicaSet) -> Result<Vec<Self::Row>> {
        let meta = namespaced_meta(cluster_uid, &rs.metadata);
        let parent = rs.metadata.name.clone().unwrap_or_default();

        Ok(pod_volumes(template_spec(rs))?
            .into_iter()
            .map(|volume| ReplicaSetVolume {
                meta: meta.renamed(&volume.name),
                replica_set_name: parent.clone(),
                volume,
            })
            .collect())
    }
}
