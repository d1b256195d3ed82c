use k8s_openapi::api::batch::v1::{Job, JobCondition};
use k8s_openapi::api::core::v1::PodSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, Time};

use crate::errors::Result;
use crate::fields::{
    namespaced_meta, pod_containers, pod_summary, pod_volumes, ContainerSummary, NamespacedMeta,
    PodSummary, VolumeSummary,
};
use crate::processors::processor::Processor;
use crate::record;

record! {
    #[derive(Debug, Clone, Default)]
    pub struct JobRow {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub pod: PodSummary,
        pub active: i32,
        pub start_time: Option<Time>,
        pub completion_time: Option<Time>,
        pub succeeded: i32,
        pub failed: i32,
        pub conditions: Option<Vec<JobCondition>>,
        pub parallelism: Option<i32>,
        pub completions: Option<i32>,
        pub active_deadline_seconds: Option<i64>,
        pub backoff_limit: Option<i32>,
        pub selector: Option<LabelSelector>,
        pub manual_selector: Option<bool>,
        pub ttl_seconds_after_finished: Option<i32>,
        pub completion_mode: Option<String>,
        pub suspend: Option<bool>,
    }
}

record! {
    #[derive(Debug, Clone, Default)]
    pub struct JobContainer {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub container: ContainerSummary,
        pub job_name: String,
        pub container_type: String,
    }
}

record! {
    #[derive(Debug, Clone, Default)]
    pub struct JobVolume {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub volume: VolumeSummary,
        pub job_name: String,
    }
}

fn template_spec(job: &Job) -> Option<&PodSpec> {
    job.spec.as_ref().and_then(|s| s.template.spec.as_ref())
}

#[derive(Debug, Clone)]
pub struct JobProcessor;

impl Processor for JobProcessor {
    type Resource = Job;
    type Row = JobRow;

    fn table_name(&self) -> &'static str {
        "jobs"
    }

    fn build_rows(&self, cluster_uid: &str, job: &Job) -> Result<Vec<Self::Row>> {
        let spec = job.spec.as_ref();
        let status = job.status.as_ref();

        Ok(vec![JobRow {
            meta: namespaced_meta(cluster_uid, &job.metadata),
            pod: pod_summary(template_spec(job)),
            active: status.and_then(|s| s.active).unwrap_or(0),
            start_time: status.and_then(|s| s.start_time.clone()),
            completion_time: status.and_then(|s| s.completion_time.clone()),
            succeeded: status.and_then(|s| s.succeeded).unwrap_or(0),
            failed: status.and_then(|s| s.failed).unwrap_or(0),
            conditions: status.and_then(|s| s.conditions.clone()),
            parallelism: spec.and_then(|s| s.parallelism),
            completions: spec.and_then(|s| s.completions),
            active_deadline_seconds: spec.and_then(|s| s.active_deadline_seconds),
            backoff_limit: spec.and_then(|s| s.backoff_limit),
            selector: spec.and_then(|s| s.selector.clone()),
            manual_selector: spec.and_then(|s| s.manual_selector),
            ttl_seconds_after_finished: spec.and_then(|s| s.ttl_seconds_after_finished),
            completion_mode: spec.and_then(|s| s.completion_mode.clone()),
            suspend: spec.and_then(|s| s.suspend),
        }])
    }
}

#[derive(Debug, Clone)]
pub struct JobContainerProcessor;

impl Processor for JobContainerProcessor {
    type Resource = Job;
    type Row = JobContainer;

    fn table_name(&self) -> &'static str {
        "job_containers"
    }

    fn build_rows(&self, cluster_uid: &str, job: &Job) -> Result<Vec<Self::Row>> {
        let meta = namespaced_meta(cluster_uid, &job.metadata);
        let parent = job.metadata.name.clone().unwrap_or_default();

        Ok(pod_containers(template_spec(job))
            .into_iter()
            .map(|(container_type, container)| JobContainer {
                meta: meta.renamed(&container.name),
                job_name: parent.clone(),
                container_type: container_type.to_string(),
                container,
            })
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct JobVolumeProcessor;

impl Processor for JobVolumeProcessor {
    type Resource = Job;
    type Row = JobVolume;

    fn table_name(&self) -> &'static str {
        "job_volumes"
    }

    fn build_rows(&self, cluster_uid: &str, job: &Job) -> Result<Vec<Self::Row>> {
        let meta = namespaced_meta(cluster_uid, &job.metadata);
        let parent = job.metadata.name.clone().unwrap_or_default();

        Ok(pod_volumes(template_spec(job))?
            .into_iter()
            .map(|volume| JobVolume {
                meta: meta.renamed(&volume.name),
                job_name: parent.clone(),
                volume,
            })
            .collect())
    }
}
