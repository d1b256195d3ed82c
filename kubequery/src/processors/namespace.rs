use k8s_openapi::api::core::v1::{Namespace, NamespaceCondition};

use crate::errors::Result;
use crate::fields::{cluster_meta, ClusterMeta};
use crate::processors::processor::Processor;
use crate::record;

record! {
    #[derive(Debug, Clone, Default)]
    pub struct NamespaceRow {
        #[embed]
        pub meta: ClusterMeta,
        pub finalizers: Option<Vec<String>>,
        pub phase: Option<String>,
        pub conditions: Option<Vec<NamespaceCondition>>,
    }
}

#[derive(Debug, Clone)]
pub struct NamespaceProcessor;

impl Processor for NamespaceProcessor {
    type Resource = Namespace;
    type Row = NamespaceRow;

    fn table_name(&self) -> &'static str {
        "namespaces"
    }

    fn build_rows(&self, cluster_uid: &str, ns: &Namespace) -> Result<Vec<Self::Row>> {
        Ok(vec![NamespaceRow {
            meta: cluster_meta(cluster_uid, &ns.metadata),
            finalizers: ns.spec.as_ref().and_then(|s| s.finalizers.clone()),
            phase: ns.status.as_ref().and_then(|s| s.phase.clone()),
            conditions: ns.status.as_ref().and_then(|s| s.conditions.clone()),
        }])
    }
}

#[cfg(test)]
mod tests {
    use k8s_openapi::serde_json::{self, json};

    use super::*;
    use crate::projection::project;

    #[test]
    fn test_namespace_row() {
        let ns: Namespace = serde_json::from_value(json!({
            "apiVersion": "v1",
            "kind": "Namespace",
            "metadata": {"name": "kube-system", "uid": "ns-1", "creationTimestamp": "2021-01-12T18:30:16Z"},
            "spec": {"finalizers": ["kubernetes"]},
            "status": {"phase": "Active"}
        }))
        .unwrap();
        let row = project(&NamespaceProcessor.build_rows("blah", &ns).unwrap()[0]).unwrap();
        assert_eq!(row["name"], "kube-system");
        assert_eq!(row["finalizers"], r#"["kubernetes"]"#);
        assert_eq!(row["phase"], "Active");
        assert_eq!(row["creation_timestamp"], "1610476216");
        assert!(!row.contains_key("namespace"));
    }
}
