use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{PodSpec, Toleration};

use crate::record;

record! {
    /// Scheduling-relevant summary of a pod spec.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct PodSummary {
        pub dns_policy: Option<String>,
        pub host_ipc: bool,
        pub host_network: bool,
        pub host_pid: bool,
        pub node_selector: Option<BTreeMap<String, String>>,
        pub priority_class_name: Option<String>,
        pub restart_policy: Option<String>,
        pub scheduler_name: Option<String>,
        pub service_account_name: Option<String>,
        pub termination_grace_period_seconds: i64,
        pub tolerations: Option<Vec<Toleration>>,
    }
}

/// A missing spec (e.g. a replica set without template) yields the zero summary.
pub fn pod_summary(spec: Option<&PodSpec>) -> PodSummary {
    let Some(spec) = spec else {
        return PodSummary::default();
    };

    PodSummary {
        dns_policy: spec.dns_policy.clone(),
        host_ipc: spec.host_ipc.unwrap_or(false),
        host_network: spec.host_network.unwrap_or(false),
        host_pid: spec.host_pid.unwrap_or(false),
        node_selector: spec.node_selector.clone(),
        priority_class_name: spec.priority_class_name.clone(),
        restart_policy: spec.restart_policy.clone(),
        scheduler_name: spec.scheduler_name.clone(),
        service_account_name: spec.service_account_name.clone(),
        termination_grace_period_seconds: spec.termination_grace_period_seconds.unwrap_or(0),
        tolerations: spec.tolerations.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::project;

    #[test]
    fn test_missing_spec_is_zero_summary() {
        let row = project(&pod_summary(None)).unwrap();
        assert_eq!(row["host_ipc"], "0");
        assert_eq!(row["host_network"], "0");
        assert_eq!(row["host_pid"], "0");
        assert_eq!(row["termination_grace_period_seconds"], "0");
        assert_eq!(row.len(), 4);
    }

    #[test]
    fn test_tolerations_rendered_in_order() {
        let spec = PodSpec {
            host_network: Some(true),
            tolerations: Some(vec![
                Toleration {
                    operator: Some("Exists".into()),
                    effect: Some("NoSchedule".into()),
                    ..Default::default()
                },
                Toleration {
                    key: Some("CriticalAddonsOnly".into()),
                    operator: Some("Exists".into()),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };
        let row = project(&pod_summary(Some(&spec))).unwrap();
        assert_eq!(row["host_network"], "1");
        assert_eq!(
            row["tolerations"],
            r#"[{"effect":"NoSchedule","operator":"Exists"},{"key":"CriticalAddonsOnly","operator":"Exists"}]"#
        );
    }
}
