use k8s_openapi::api::apps::v1::{
    StatefulSet, StatefulSetCondition, StatefulSetPersistentVolumeClaimRetentionPolicy,
    StatefulSetUpdateStrategy,
};
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, PodSpec};
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
    pub struct StatefulSetRow {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub pod: PodSummary,
        pub observed_generation: i64,
        pub replicas: i32,
        pub ready_replicas: i32,
        pub current_replicas: i32,
        pub updated_replicas: i32,
        pub current_revision: Option<String>,
        pub update_revision: Option<String>,
        pub collision_count: Option<i32>,
        pub available_replicas: i32,
        pub conditions: Option<Vec<StatefulSetCondition>>,
        pub stateful_set_replicas: Option<i32>,
        pub selector: Option<LabelSelector>,
        pub volume_claim_templates: Option<Vec<PersistentVolumeClaim>>,
        pub pod_management_policy: Option<String>,
        pub update_strategy: Option<StatefulSetUpdateStrategy>,
        pub revision_history_limit: Option<i32>,
        pub min_ready_seconds: i32,
        pub persistent_volume_claim_retention_policy:
            Option<StatefulSetPersistentVolumeClaimRetentionPolicy>,
    }
}

record! {
    #[derive(Debug, Clone, Default)]
    pub struct StatefulSetContainer {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub container: ContainerSummary,
        pub stateful_set_name: String,
        pub container_type: String,
    }
}

record! {
    #[derive(Debug, Clone, Default)]
    pub struct StatefulSetVolume {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub volume: VolumeSummary,
        pub stateful_set_name: String,
    }
}

fn template_spec(sts: &StatefulSet) -> Option<&PodSpec> {
    sts.spec.as_ref().and_then(|s| s.template.spec.as_ref())
}

#[derive(Debug, Clone)]
pub struct StatefulSetProcessor;

impl Processor for StatefulSetProcessor {
    type Resource = StatefulSet;
    type Row = StatefulSetRow;

    fn table_name(&self) -> &'static str {
        "stateful_sets"
    }

    fn build_rows(&self, cluster_uid: &str, sts: &StatefulSet) -> Result<Vec<Self::Row>> {
        let spec = sts.spec.as_ref();
        let status = sts.status.as_ref();

        Ok(vec![StatefulSetRow {
            meta: namespaced_meta(cluster_uid, &sts.metadata),
            pod: pod_summary(template_spec(sts)),
            observed_generation: status.and_then(|s| s.observed_generation).unwrap_or(0),
            replicas: status.map(|s| s.replicas).unwrap_or(0),
            ready_replicas: status.and_then(|s| s.ready_replicas).unwrap_or(0),
            current_replicas: status.and_then(|s| s.current_replicas).unwrap_or(0),
            updated_replicas: status.and_then(|s| s.updated_replicas).unwrap_or(0),
            current_revision: status.and_then(|s| s.current_revision.clone()),
            update_revision: status.and_then(|s| s.update_revision.clone()),
            collision_count: status.and_then(|s| s.collision_count),
            available_replicas: status.and_then(|s| s.available_replicas).unwrap_or(0),
            conditions: status.and_then(|s| s.conditions.clone()),
            stateful_set_replicas: spec.and_then(|s| s.replicas),
            selector: spec.map(|s| s.selector.clone()),
            volume_claim_templates: spec.and_then(|s| s.volume_claim_templates.clone()),
            pod_management_policy: spec.and_then(|s| s.pod_management_policy.clone()),
            update_strategy: spec.and_then(|s| s.update_strategy.clone()),
            revision_history_limit: spec.and_then(|s| s.revision_history_limit),
            min_ready_seconds: spec.and_then(|s| s.min_ready_seconds).unwrap_or(0),
            persistent_volume_claim_retention_policy: spec
                .and_then(|s| s.persistent_volume_claim_retention_policy.clone()),
        }])
    }
}

#[derive(Debug, Clone)]
pub struct StatefulSetContainerProcessor;

impl Processor for StatefulSetContainerProcessor {
    type Resource = StatefulSet;
    type Row = StatefulSetContainer;

    fn table_name(&self) -> &'static str {
        "stateful_set_containers"
    }

    fn build_rows(&self, cluster_uid: &str, sts: &StatefulSet) -> Result<Vec<Self::Row>> {
        let meta = namespaced_meta(cluster_uid, &sts.metadata);
        let parent = sts.metadata.name.clone().unwrap_or_default();

        Ok(pod_containers(template_spec(sts))
            .into_iter()
            .map(|(container_type, container)| StatefulSetContainer {
                meta: meta.renamed(&container.name),
                stateful_set_name: parent.clone(),
                container_type: container_type.to_string(),
                container,
            })
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct StatefulSetVolumeProcessor;

impl Processor for StatefulSetVolumeProcessor {
    type Resource = StatefulSet;
    type Row = StatefulSetVolume;

    fn table_name(&self) -> &'static str {
        "stateful_set_volumes"
    }

    fn build_rows(&self, cluster_uid: &str, sts: &StatefulSet) -> Result<Vec<Self::Row>> {
        let meta = namespaced_meta(cluster_uid, &sts.metadata);
        let parent = sts.metadata.name.clone().unwrap_or_default();

        Ok(pod_volumes(template_spec(sts))?
            .into_iter()
            .map(|volume| StatefulSetVolume {
                meta: meta.renamed(&volume.name),
                stateful_set_name: parent.clone(),
                volume,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use k8s_openapi::serde_json::{self, json};

    use super::*;
    use crate::projection::project;

    #[test]
    fn test_stateful_set_row() {
        let sts: StatefulSet = serde_json::from_value(json!({
            "apiVersion": "apps/v1",
            "kind": "StatefulSet",
            "metadata": {"name": "db", "namespace": "data"},
            "spec": {
                "replicas": 2,
                "serviceName": "db",
                "selector": {"matchLabels": {"app": "db"}},
                "podManagementPolicy": "Parallel",
                "template": {"spec": {"containers": [{"name": "postgres"}]}},
                "volumeClaimTemplates": [{
                    "metadata": {"name": "data"},
                    "spec": {"accessModes": ["ReadWriteOnce"], "resources": {"requests": {"storage": "10Gi"}}}
                }]
            },
            "status": {"replicas": 2, "currentRevision": "db-7c9", "availableReplicas": 1}
        }))
        .unwrap();

        let row = project(&StatefulSetProcessor.build_rows("blah", &sts).unwrap()[0]).unwrap();
        assert_eq!(row["stateful_set_replicas"], "2");
        assert_eq!(row["replicas"], "2");
        assert_eq!(row["available_replicas"], "1");
        assert_eq!(row["ready_replicas"], "0");
        assert_eq!(row["current_revision"], "db-7c9");
        assert_eq!(row["pod_management_policy"], "Parallel");
        assert!(!row.contains_key("collision_count"));
        assert_eq!(
            row["volume_claim_templates"],
            r#"[{"apiVersion":"v1","kind":"PersistentVolumeClaim","metadata":{"name":"data"},"spec":{"accessModes":["ReadWriteOnce"],"resources":{"requests":{"storage":"10Gi"}}}}]"#
        );
        assert!(!row.contains_key("update_revision"));
    }
}
