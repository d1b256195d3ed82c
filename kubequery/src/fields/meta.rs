use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};

use crate::record;

record! {
    /// Object meta of a namespaced kind.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct NamespacedMeta {
        pub cluster_uid: String,
        pub uid: Option<String>,
        pub name: Option<String>,
        pub namespace: Option<String>,
        pub creation_timestamp: Option<Time>,
        pub labels: Option<BTreeMap<String, String>>,
        pub annotations: Option<BTreeMap<String, String>>,
    }
}

record! {
    /// Object meta of a cluster-scoped kind.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ClusterMeta {
        pub cluster_uid: String,
        pub uid: Option<String>,
        pub name: Option<String>,
        pub creation_timestamp: Option<Time>,
        pub labels: Option<BTreeMap<String, String>>,
        pub annotations: Option<BTreeMap<String, String>>,
    }
}

pub fn namespaced_meta(cluster_uid: &str, meta: &ObjectMeta) -> NamespacedMeta {
    NamespacedMeta {
        cluster_uid: cluster_uid.to_string(),
        uid: meta.uid.clone(),
        name: meta.name.clone(),
        namespace: meta.namespace.clone(),
        creation_timestamp: meta.creation_timestamp.clone(),
        labels: meta.labels.clone(),
        annotations: meta.annotations.clone(),
    }
}

pub fn cluster_meta(cluster_uid: &str, meta: &ObjectMeta) -> ClusterMeta {
    ClusterMeta {
        cluster_uid: cluster_uid.to_string(),
        uid: meta.uid.clone(),
        name: meta.name.clone(),
        creation_timestamp: meta.creation_timestamp.clone(),
        labels: meta.labels.clone(),
        annotations: meta.annotations.clone(),
    }
}

impl NamespacedMeta {
    /// The parent's meta under a child's name, for container and volume rows.
    pub fn renamed(&self, name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{project, schema_of};

    #[test]
    fn test_namespaced_meta_columns() {
        let names: Vec<String> = schema_of::<NamespacedMeta>()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "cluster_uid",
                "uid",
                "name",
                "namespace",
                "creation_timestamp",
                "labels",
                "annotations"
            ]
        );
    }

    #[test]
    fn test_cluster_meta_has_no_namespace() {
        assert!(schema_of::<ClusterMeta>()
            .iter()
            .all(|c| c.name != "namespace"));
    }

    #[test]
    fn test_renamed_keeps_parent_identity() {
        let meta = namespaced_meta(
            "blah",
            &ObjectMeta {
                name: Some("calico-node".into()),
                namespace: Some("kube-system".into()),
                uid: Some("u-1".into()),
                labels: Some([("k8s-app".to_string(), "calico-node".to_string())].into()),
                ..Default::default()
            },
        );
        let row = project(&meta.renamed("install-cni")).unwrap();
        assert_eq!(row["name"], "install-cni");
        assert_eq!(row["uid"], "u-1");
        assert_eq!(row["cluster_uid"], "blah");
        assert_eq!(row["labels"], r#"{"k8s-app":"calico-node"}"#);
        assert!(!row.contains_key("annotations"));
        assert!(!row.contains_key("creation_timestamp"));
    }
}
