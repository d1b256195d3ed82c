use k8s_openapi::api::core::v1::{Pod, PodCondition};
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
    pub struct PodRow {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub pod: PodSummary,
        pub node_name: Option<String>,
        pub hostname: Option<String>,
        pub subdomain: Option<String>,
        pub priority: Option<i32>,
        pub phase: Option<String>,
        pub conditions: Option<Vec<PodCondition>>,
        pub message: Option<String>,
        pub reason: Option<String>,
        pub nominated_node_name: Option<String>,
        pub host_ip: Option<String>,
        pub pod_ip: Option<String>,
        pub start_time: Option<Time>,
        pub qos_class: Option<String>,
    }
}

record! {
    #[derive(Debug, Clone, Default)]
    pub struct PodContainer {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub container: ContainerSummary,
        pub pod_name: String,
        pub container_type: String,
    }
}

record! {
    #[derive(Debug, Clone, Default)]
    pub struct PodVolume {
        #[embed]
        pub meta: NamespacedMeta,
        #[embed]
        pub volume: VolumeSummary,
        pub pod_name: String,
    }
}

#[derive(Debug, Clone)]
pub struct PodProcessor;

impl Processor for PodProcessor {
    type Resource = Pod;
    type Row = PodRow;

    fn table_name(&self) -> &'static str {
        "pods"
    }

    fn build_rows(&self, cluster_uid: &str, pod: &Pod) -> Result<Vec<Self::Row>> {
        let spec = pod.spec.as_ref();
        let status = pod.status.as_ref();

        Ok(vec![PodRow {
            meta: namespaced_meta(cluster_uid, &pod.metadata),
            pod: pod_summary(spec),
            node_name: spec.and_then(|s| s.node_name.clone()),
            hostname: spec.and_then(|s| s.hostname.clone()),
            subdomain: spec.and_then(|s| s.subdomain.clone()),
            priority: spec.and_then(|s| s.priority),
            phase: status.and_then(|s| s.phase.clone()),
            conditions: status.and_then(|s| s.conditions.clone()),
            message: status.and_then(|s| s.message.clone()),
            reason: status.and_then(|s| s.reason.clone()),
            nominated_node_name: status.and_then(|s| s.nominated_node_name.clone()),
            host_ip: status.and_then(|s| s.host_ip.clone()),
            pod_ip: status.and_then(|s| s.pod_ip.clone()),
            start_time: status.and_then(|s| s.start_time.clone()),
            qos_class: status.and_then(|s| s.qos_class.clone()),
        }])
    }
}

#[derive(Debug, Clone)]
pub struct PodContainerProcessor;

impl Processor for PodContainerProcessor {
    type Resource = Pod;
    type Row = PodContainer;

    fn table_name(&self) -> &'static str {
        "pod_containers"
    }

    fn build_rows(&self, cluster_uid: &str, pod: &Pod) -> Result<Vec<Self::Row>> {
        let meta = namespaced_meta(cluster_uid, &pod.metadata);
        let parent = pod.metadata.name.clone().unwrap_or_default();

        Ok(pod_containers(pod.spec.as_ref())
            .into_iter()
            .map(|(container_type, container)| PodContainer {
                meta: meta.renamed(&container.name),
                pod_name: parent.clone(),
                container_type: container_type.to_string(),
                container,
            })
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct PodVolumeProcessor;

impl Processor for PodVolumeProcessor {
    type Resource = Pod;
    type Row = PodVolume;

    fn table_name(&self) -> &'static str {
        "pod_volumes"
    }

    fn build_rows(&self, cluster_uid: &str, pod: &Pod) -> Result<Vec<Self::Row>> {
        let meta = namespaced_meta(cluster_uid, &pod.metadata);
        let parent = pod.metadata.name.clone().unwrap_or_default();

        Ok(pod_volumes(pod.spec.as_ref())?
            .into_iter()
            .map(|volume| PodVolume {
                meta: meta.renamed(&volume.name),
                pod_name: parent.clone(),
                volume,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use k8s_openapi::serde_json::{self, json};

    use super::*;
    use crate::processors::processor::generate_rows;
    use crate::processors::testing::FakePager;
    use crate::projection::project;
    use crate::state::ClusterState;
    use crate::structs::HostContext;

    fn pod(name: &str, ephemeral: bool) -> serde_json::Value {
        let mut pod = json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {"name": name, "namespace": "default", "uid": format!("uid-{name}")},
            "spec": {
                "initContainers": [{"name": "init"}],
                "containers": [{"name": "app", "tty": true}, {"name": "sidecar"}],
                "priority": 0
            },
            "status": {"phase": "Running", "podIP": "10.1.0.7", "qosClass": "BestEffort"}
        });
        if ephemeral {
            pod["spec"]["ephemeralContainers"] = json!([{"name": "debugger"}]);
        }
        pod
    }

    #[test]
    fn test_pod_row() {
        let p: Pod = serde_json::from_value(pod("web-0", false)).unwrap();
        let row = project(&PodProcessor.build_rows("blah", &p).unwrap()[0]).unwrap();
        assert_eq!(row["phase"], "Running");
        assert_eq!(row["pod_ip"], "10.1.0.7");
        assert_eq!(row["priority"], "0");
        assert_eq!(row["qos_class"], "BestEffort");
        assert!(!row.contains_key("node_name"));
    }

    #[tokio::test]
    async fn test_container_rows_count_every_kind_of_container() {
        let items = vec![
            serde_json::from_value(pod("web-0", false)).unwrap(),
            serde_json::from_value(pod("web-1", true)).unwrap(),
        ];
        let state = ClusterState::new(
            Arc::new(FakePager::default().page("Pod", None, items, None)),
            "blah",
        );

        let rows = generate_rows(&PodContainerProcessor, &state, &HostContext::new())
            .await
            .unwrap();
        // 3 containers in the first pod, 4 in the second.
        assert_eq!(rows.len(), 7);
        let listed: Vec<(&str, &str, &str)> = rows
            .iter()
            .map(|r| {
                (
                    r["pod_name"].as_str(),
                    r["name"].as_str(),
                    r["container_type"].as_str(),
                )
            })
            .collect();
        assert_eq!(
            listed,
            vec![
                ("web-0", "init", "init"),
                ("web-0", "app", "container"),
                ("web-0", "sidecar", "container"),
                ("web-1", "init", "init"),
                ("web-1", "app", "container"),
                ("web-1", "sidecar", "container"),
                ("web-1", "debugger", "ephemeral"),
            ]
        );
        assert!(rows
            .iter()
            .all(|r| matches!(r["tty"].as_str(), "0" | "1") && matches!(r["stdin"].as_str(), "0" | "1")));
        assert_eq!(rows[1]["tty"], "1");
    }
}
