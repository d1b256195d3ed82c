use k8s_openapi::api::apps::v1::{Deployment, DeploymentCondition, DeploymentStrategy};
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
    pub struct DeploymentRow {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub pod: PodSummary,
        pub observed_generation: i64,
        pub replicas: i32,
        pub updated_replicas: i32,
        pub ready_replicas: i32,
        pub available_replicas: i32,
        pub unavailable_replicas: i32,
        pub collision_count: Option<i32>,
        pub conditions: Option<Vec<DeploymentCondition>>,
        pub deployment_replicas: Option<i32>,
        pub selector: Option<LabelSelector>,
        pub strategy: Option<DeploymentStrategy>,
        pub min_ready_seconds: i32,
        pub revision_history_limit: Option<i32>,
        pub paused: bool,
        pub progress_deadline_seconds: Option<i32>,
    }
}

record! {
    #[derive(Debug, Clone, Default)]
    pub struct DeploymentContainer {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub container: ContainerSummary,
        pub deployment_name: String,
        pub container_type: String,
    }
}

record! {
    #[derive(Debug, Clone, Default)]
    pub struct DeploymentVolume {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub volume: VolumeSummary,
        pub deployment_name: String,
    }
}

fn template_spec(deployment: &Deployment) -> Option<&PodSpec> {
    deployment
        .spec
        .as_ref()
        .and_then(|s| s.template.spec.as_ref())
}

#[derive(Debug, Clone)]
pub struct DeploymentProcessor;

impl Processor for DeploymentProcessor {
    type Resource = Deployment;
    type Row = DeploymentRow;

    fn table_name(&self) -> &'static str {
        "deployments"
    }

    fn build_rows(&self, cluster_uid: &str, deployment: &Deployment) -> Result<Vec<Self::Row>> {
        let spec = deployment.spec.as_ref();
        let status = deployment.status.as_ref();

        Ok(vec![DeploymentRow {
            meta: namespaced_meta(cluster_uid, &deployment.metadata),
            pod: pod_summary(template_spec(deployment)),
            observed_generation: status.and_then(|s| s.observed_generation).unwrap_or(0),
            replicas: status.and_then(|s| s.replicas).unwrap_or(0),
            updated_replicas: status.and_then(|s| s.updated_replicas).unwrap_or(0),
            ready_replicas: status.and_then(|s| s.ready_replicas).unwrap_or(0),
            available_replicas: status.and_then(|s| s.available_replicas).unwrap_or(0),
            unavailable_replicas: status.and_then(|s| s.unavailable_replicas).unwrap_or(0),
            collision_count: status.and_then(|s| s.collision_count),
            conditions: status.and_then(|s| s.conditions.clone()),
            deployment_replicas: spec.and_then(|s| s.replicas),
            selector: spec.map(|s| s.selector.clone()),
            strategy: spec.and_then(|s| s.strategy.clone()),
            min_ready_seconds: spec.and_then(|s| s.min_ready_seconds).unwrap_or(0),
            revision_history_limit: spec.and_then(|s| s.revision_history_limit),
            paused: spec.and_then(|s| s.paused).unwrap_or(false),
            progress_deadline_seconds: spec.and_then(|s| s.progress_deadline_seconds),
        }])
    }
}

#[derive(Debug, Clone)]
pub struct DeploymentContainerProcessor;

impl Processor for DeploymentContainerProcessor {
    type Resource = Deployment;
    type Row = DeploymentContainer;

    fn table_name(&self) -> &'static str {
        "deployment_containers"
    }

    fn build_rows(&self, cluster_uid: &str, deployment: &Deployment) -> Result<Vec<Self::Row>> {
        let meta = namespaced_meta(cluster_uid, &deployment.metadata);
        let parent = deployment.metadata.name.clone().unwrap_or_default();

        Ok(pod_containers(template_spec(deployment))
            .into_iter()
            .map(|(container_type, container)| DeploymentContainer {
                meta: meta.renamed(&container.name),
                deployment_name: parent.clone(),
                container_type: container_type.to_string(),
                container,
            })
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct DeploymentVolumeProcessor;

impl Processor for DeploymentVolumeProcessor {
    type Resource = Deployment;
    type Row = DeploymentVolume;

    fn table_name(&self) -> &'static str {
        "deployment_volumes"
    }

    fn build_rows(&self, cluster_uid: &str, deployment: &Deployment) -> Result<Vec<Self::Row>> {
        let meta = namespaced_meta(cluster_uid, &deployment.metadata);
        let parent = deployment.metadata.name.clone().unwrap_or_default();

        Ok(pod_volumes(template_spec(deployment))?
            .into_iter()
            .map(|volume| DeploymentVolume {
                meta: meta.renamed(&volume.name),
                deployment_name: parent.clone(),
                volume,
            })
            .collect())
    }
}
