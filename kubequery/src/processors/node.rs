use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{Node, NodeAddress, Taint};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

use crate::errors::Result;
use crate::fields::{cluster_meta, ClusterMeta};
use crate::processors::processor::Processor;
use crate::record;

record! {
    #[derive(Debug, Clone, Default)]
    pub struct NodeRow {
        #[embed]
        pub meta: ClusterMeta,
        pub pod_cidr: Option<String>,
        pub provider_id: Option<String>,
        pub unschedulable: bool,
        pub taints: Option<Vec<Taint>>,
        pub capacity: Option<BTreeMap<String, Quantity>>,
        pub allocatable: Option<BTreeMap<String, Quantity>>,
        pub addresses: Option<Vec<NodeAddress>>,
        pub phase: Option<String>,
        pub machine_id: Option<String>,
        pub system_uuid: Option<String>,
        pub boot_id: Option<String>,
        pub kernel_version: Option<String>,
        pub os_image: Option<String>,
        pub container_runtime_version: Option<String>,
        pub kubelet_version: Option<String>,
        pub kube_proxy_version: Option<String>,
        pub operating_system: Option<String>,
        pub architecture: Option<String>,
    }
}

#[derive(Debug, Clone)]
pub struct NodeProcessor;

impl Processor for NodeProcessor {
    type Resource = Node;
    type Row = NodeRow;

    fn table_name(&self) -> &'static str {
        "nodes"
    }

    fn build_rows(&self, cluster_uid: &str, node: &Node) -> Result<Vec<Self::Row>> {
        let spec = node.spec.as_ref();
        let status = node.status.as_ref();
        let info = status.and_then(|s| s.node_info.as_ref());

        Ok(vec![NodeRow {
            meta: cluster_meta(cluster_uid, &node.metadata),
            pod_cidr: spec.and_then(|s| s.pod_cidr.clone()),
            provider_id: spec.and_then(|s| s.provider_id.clone()),
            unschedulable: spec.and_then(|s| s.unschedulable).unwrap_or(false),
            taints: spec.and_then(|s| s.taints.clone()),
            capacity: status.and_then(|s| s.capacity.clone()),
            allocatable: status.and_then(|s| s.allocatable.clone()),
            addresses: status.and_then(|s| s.addresses.clone()),
            phase: status.and_then(|s| s.phase.clone()),
            machine_id: info.map(|i| i.machine_id.clone()),
            system_uuid: info.map(|i| i.system_uuid.clone()),
            boot_id: info.map(|i| i.boot_id.clone()),
            kernel_version: info.map(|i| i.kernel_version.clone()),
            os_image: info.map(|i| i.os_image.clone()),
            container_runtime_version: info.map(|i| i.container_runtime_version.clone()),
            kubelet_version: info.map(|i| i.kubelet_version.clone()),
            kube_proxy_version: info.map(|i| i.kube_proxy_version.clone()),
            operating_system: info.map(|i| i.operating_system.clone()),
            architecture: info.map(|i| i.architecture.clone()),
        }])
    }
}
