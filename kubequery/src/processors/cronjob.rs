use k8s_openapi::api::batch::v1::CronJob;
use k8s_openapi::api::core::v1::{ObjectReference, PodSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

use crate::errors::Result;
use crate::fields::{
    namespaced_meta, pod_containers, pod_summary, pod_volumes, ContainerSummary, NamespacedMeta,
    PodSummary, VolumeSummary,
};
use crate::processors::processor::Processor;
use crate::record;

record! {
    #[derive(Debug, Clone, Default)]
    pub struct CronJobRow {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub pod: PodSummary,
        pub schedule: String,
        pub time_zone: Option<String>,
        pub starting_deadline_seconds: Option<i64>,
        pub concurrency_policy: Option<String>,
        pub suspend: Option<bool>,
        pub successful_jobs_history_limit: Option<i32>,
        pub failed_jobs_history_limit: Option<i32>,
        pub active: Option<Vec<ObjectReference>>,
        pub last_schedule_time: Option<Time>,
        pub last_successful_time: Option<Time>,
    }
}

record! {
    #[derive(Debug, Clone, Default)]
    pub struct CronJobContainer {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub container: ContainerSummary,
        pub cron_job_name: String,
        pub container_type: String,
    }
}

record! {
    #[derive(Debug, Clone, Default)]
    pub struct CronJobVolume {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub volume: VolumeSummary,
        pub cron_job_name: String,
    }
}

/// The pod spec two templates down: cron job, then job.
fn template_spec(cj: &CronJob) -> Option<&PodSpec> {
    cj.spec
        .as_ref()
        .and_then(|s| s.job_template.spec.as_ref())
        .and_then(|js| js.template.spec.as_ref())
}

#[derive(Debug, Clone)]
pub struct CronJobProcessor;

impl Processor for CronJobProcessor {
    type Resource = CronJob;
    type Row = CronJobRow;

    fn table_name(&self) -> &'static str {
        "cron_jobs"
    }

    fn build_rows(&self, cluster_uid: &str, cj: &CronJob) -> Result<Vec<Self::Row>> {
        let spec = cj.spec.as_ref();
        let status = cj.status.as_ref();

        Ok(vec![CronJobRow {
            meta: namespaced_meta(cluster_uid, &cj.metadata),
            pod: pod_summary(template_spec(cj)),
            schedule: spec.map(|s| s.schedule.clone()).unwrap_or_default(),
            time_zone: spec.and_then(|s| s.time_zone.clone()),
            starting_deadline_seconds: spec.and_then(|s| s.starting_deadline_seconds),
            concurrency_policy: spec.and_then(|s| s.concurrency_policy.clone()),
            suspend: spec.and_then(|s| s.suspend),
            successful_jobs_history_limit: spec.and_then(|s| s.successful_jobs_history_limit),
            failed_jobs_history_limit: spec.and_then(|s| s.failed_jobs_history_limit),
            active: status.and_then(|s| s.active.clone()),
            last_schedule_time: status.and_then(|s| s.last_schedule_time.clone()),
            last_successful_time: status.and_then(|s| s.last_successful_time.clone()),
        }])
    }
}

#[derive(Debug, Clone)]
pub struct CronJobContainerProcessor;

impl Processor for CronJobContainerProcessor {
    type Resource = CronJob;
    type Row = CronJobContainer;

    fn table_name(&self) -> &'static str {
        "cron_job_containers"
    }

    fn build_rows(&self, cluster_uid: &str, cj: &CronJob) -> Result<Vec<Self::Row>> {
        let meta = namespaced_meta(cluster_uid, &cj.metadata);
        let parent = cj.metadata.name.clone().unwrap_or_default();

        Ok(pod_containers(template_spec(cj))
            .into_iter()
            .map(|(container_type, container)| CronJobContainer {
                meta: meta.renamed(&container.name),
                cron_job_name: parent.clone(),
                container_type: container_type.to_string(),
                container,
            })
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct CronJobVolumeProcessor;

impl Processor for CronJobVolumeProcessor {
    type Resource = CronJob;
    type Row = CronJobVolume;

    fn table_name(&self) -> &'static str {
        "cron_job_volumes"
    }

    fn build_rows(&self, cluster_uid: &str, cj: &CronJob) -> Result<Vec<Self::Row>> {
        let meta = namespaced_meta(cluster_uid, &cj.metadata);
        let parent = cj.metadata.name.clone().unwrap_or_default();

        Ok(pod_volumes(template_spec(cj))?
            .into_iter()
            .map(|volume| CronJobVolume {
                meta: meta.renamed(&volume.name),
                cron_job_name: parent.clone(),
                volume,
            })
            .collect())
    }
}
