use k8s_openapi::api::apps::v1::{DaemonSet, DaemonSetCondition, DaemonSetUpdateStrategy};
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
    pub struct DaemonSetRow {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub pod: PodSummary,
        pub current_number_scheduled: i32,
        pub number_misscheduled: i32,
        pub desired_number_scheduled: i32,
        pub number_ready: i32,
        pub observed_generation: i64,
        pub updated_number_scheduled: i32,
        pub number_available: i32,
        pub number_unavailable: i32,
        pub collision_count: Option<i32>,
        pub conditions: Option<Vec<DaemonSetCondition>>,
        pub selector: Option<LabelSelector>,
        pub update_strategy: Option<DaemonSetUpdateStrategy>,
        pub min_ready_seconds: i32,
        pub revision_history_limit: Option<i32>,
    }
}

record! {
    #[derive(Debug, Clone, Default)]
    pub struct DaemonSetContainer {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub container: ContainerSummary,
        pub daemon_set_name: String,
        pub container_type: String,
    }
}

record! {
    #[derive(Debug, Clone, Default)]
    pub struct DaemonSetVolume {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub volume: VolumeSummary,
        pub daemon_set_name: String,
    }
}

fn template_spec(ds: &DaemonSet) -> Option<&PodSpec> {
    ds.spec.as_ref().and_then(|s| s.template.spec.as_ref())
}

#[derive(Debug, Clone)]
pub struct DaemonSetProcessor;

impl Processor for DaemonSetProcessor {
    type Resource = DaemonSet;
    type Row = DaemonSetRow;

    fn table_name(&self) -> &'static str {
        "daemon_sets"
    }

    fn build_rows(&self, cluster_uid: &str, ds: &DaemonSet) -> Result<Vec<Self::Row>> {
        let spec = ds.spec.as_ref();
        let status = ds.status.as_ref();

        Ok(vec![DaemonSetRow {
            meta: namespaced_meta(cluster_uid, &ds.metadata),
            pod: pod_summary(template_spec(ds)),
            current_number_scheduled: status.map(|s| s.current_number_scheduled).unwrap_or(0),
            number_misscheduled: status.map(|s| s.number_misscheduled).unwrap_or(0),
            desired_number_scheduled: status.map(|s| s.desired_number_scheduled).unwrap_or(0),
            number_ready: status.map(|s| s.number_ready).unwrap_or(0),
            observed_generation: status.and_then(|s| s.observed_generation).unwrap_or(0),
            updated_number_scheduled: status.and_then(|s| s.updated_number_scheduled).unwrap_or(0),
            number_available: status.and_then(|s| s.number_available).unwrap_or(0),
            number_unavailable: status.and_then(|s| s.number_unavailable).unwrap_or(0),
            collision_count: status.and_then(|s| s.collision_count),
            conditions: status.and_then(|s| s.conditions.clone()),
            selector: spec.map(|s| s.selector.clone()),
            update_strategy: spec.and_then(|s| s.update_strategy.clone()),
            min_ready_seconds: spec.and_then(|s| s.min_ready_seconds).unwrap_or(0),
            revision_history_limit: spec.and_then(|s| s.revision_history_limit),
        }])
    }
}

#[derive(Debug, Clone)]
pub struct DaemonSetContainerProcessor;

impl Processor for DaemonSetContainerProcessor {
    type Resource = DaemonSet;
    type Row = DaemonSetContainer;

    fn table_name(&self) -> &'static str {
        "daemon_set_containers"
    }

    fn build_rows(&self, cluster_uid: &str, ds: &DaemonSet) -> Result<Vec<Self::Row>> {
        let meta = namespaced_meta(cluster_uid, &ds.metadata);
        let parent = ds.metadata.name.clone().unwrap_or_default();

        Ok(pod_containers(template_spec(ds))
            .into_iter()
            .map(|(container_type, container)| DaemonSetContainer {
                meta: meta.renamed(&container.name),
                daemon_set_name: parent.clone(),
                container_type: container_type.to_string(),
                container,
            })
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct DaemonSetVolumeProcessor;

impl Processor for DaemonSetVolumeProcessor {
    type Resource = DaemonSet;
    type Row = DaemonSetVolume;

    fn table_name(&self) -> &'static str {
        "daemon_set_volumes"
    }

    fn build_rows(&self, cluster_uid: &str, ds: &DaemonSet) -> Result<Vec<Self::Row>> {
        let meta = namespaced_meta(cluster_uid, &ds.metadata);
        let parent = ds.metadata.name.clone().unwrap_or_default();

        Ok(pod_volumes(template_spec(ds))?
            .into_iter()
            .map(|volume| DaemonSetVolume {
                meta: meta.renamed(&volume.name),
                daemon_set_name: parent.clone(),
                volume,
            })
            .collect())
    }
}
