use std::fmt;

use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvFromSource, EnvVar, EphemeralContainer, PodSpec, Probe,
    ResourceRequirements, VolumeMount,
};

use crate::record;

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ContainerSummary {
        pub name: String,
        pub image: Option<String>,
        pub image_pull_policy: Option<String>,
        pub command: Option<Vec<String>>,
        pub args: Option<Vec<String>>,
        pub working_dir: Option<String>,
        pub env: Option<Vec<EnvVar>>,
        pub env_from: Option<Vec<EnvFromSource>>,
        pub ports: Option<Vec<ContainerPort>>,
        pub resources: Option<ResourceRequirements>,
        pub liveness_probe: Option<Probe>,
        pub readiness_probe: Option<Probe>,
        pub startup_probe: Option<Probe>,
        pub volume_mounts: Option<Vec<VolumeMount>>,
        pub stdin: bool,
        pub stdin_once: bool,
        pub tty: bool,
        pub privileged: Option<bool>,
        pub termination_message_path: Option<String>,
        pub termination_message_policy: Option<String>,
    }
}

/// Where a container sits in its pod spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerType {
    Init,
    Container,
    Ephemeral,
}

impl ContainerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerType::Init => "init",
            ContainerType::Container => "container",
            ContainerType::Ephemeral => "ephemeral",
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn container_summary(c: &Container) -> ContainerSummary {
    ContainerSummary {
        name: c.name.clone(),
        image: c.image.clone(),
        image_pull_policy: c.image_pull_policy.clone(),
        command: c.command.clone(),
        args: c.args.clone(),
        working_dir: c.working_dir.clone(),
        env: c.env.clone(),
        env_from: c.env_from.clone(),
        ports: c.ports.clone(),
        resources: c.resources.clone(),
        liveness_probe: c.liveness_probe.clone(),
        readiness_probe: c.readiness_probe.clone(),
        startup_probe: c.startup_probe.clone(),
        volume_mounts: c.volume_mounts.clone(),
        stdin: c.stdin.unwrap_or(false),
        stdin_once: c.stdin_once.unwrap_or(false),
        tty: c.tty.unwrap_or(false),
        privileged: c.security_context.as_ref().and_then(|sc| sc.privileged),
        termination_message_path: c.termination_message_path.clone(),
        termination_message_policy: c.termination_message_policy.clone(),
    }
}

pub fn ephemeral_container_summary(c: &EphemeralContainer) -> ContainerSummary {
    ContainerSummary {
        name: c.name.clone(),
        image: c.image.clone(),
        image_pull_policy: c.image_pull_policy.clone(),
        command: c.command.clone(),
        args: c.args.clone(),
        working_dir: c.working_dir.clone(),
        env: c.env.clone(),
        env_from: c.env_from.clone(),
        ports: c.ports.clone(),
        resources: c.resources.clone(),
        liveness_probe: c.liveness_probe.clone(),
        readiness_probe: c.readiness_probe.clone(),
        startup_probe: c.startup_probe.clone(),
        volume_mounts: c.volume_mounts.clone(),
        stdin: c.stdin.unwrap_or(false),
        stdin_once: c.stdin_once.unwrap_or(false),
        tty: c.tty.unwrap_or(false),
        privileged: c.security_context.as_ref().and_then(|sc| sc.privileged),
        termination_message_path: c.termination_message_path.clone(),
        termination_message_policy: c.termination_message_policy.clone(),
    }
}

/// Every container of a pod spec: init containers, then regular, then
/// ephemeral, each in spec order.
pub fn pod_containers(spec: Option<&PodSpec>) -> Vec<(ContainerType, ContainerSummary)> {
    let Some(spec) = spec else {
        return Vec::new();
    };

    let init = spec
        .init_containers
        .iter()
        .flatten()
        .map(|c| (ContainerType::Init, container_summary(c)));
    let regular = spec
        .containers
        .iter()
        .map(|c| (ContainerType::Container, container_summary(c)));
    let ephemeral = spec
        .ephemeral_containers
        .iter()
        .flatten()
        .map(|c| (ContainerType::Ephemeral, ephemeral_container_summary(c)));

    init.chain(regular).chain(ephemeral).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::project;
    use k8s_openapi::api::core::v1::SecurityContext;
    use k8s_openapi::serde_json::{self, json};

    fn named(name: &str) -> Container {
        Container {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_pod_containers_order() {
        let spec = PodSpec {
            init_containers: Some(vec![named("a-init"), named("b-init")]),
            containers: vec![named("main")],
            ephemeral_containers: Some(vec![EphemeralContainer {
                name: "debugger".into(),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let listed: Vec<(ContainerType, String)> = pod_containers(Some(&spec))
            .into_iter()
            .map(|(ty, c)| (ty, c.name))
            .collect();
        assert_eq!(
            listed,
            vec![
                (ContainerType::Init, "a-init".to_string()),
                (ContainerType::Init, "b-init".to_string()),
                (ContainerType::Container, "main".to_string()),
                (ContainerType::Ephemeral, "debugger".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_spec_no_containers() {
        assert!(pod_containers(None).is_empty());
    }

    #[test]
    fn test_container_projection() {
        let c = Container {
            name: "calico-node".into(),
            image: Some("calico/node:v3.13.2".into()),
            security_context: Some(SecurityContext {
                privileged: Some(true),
                ..Default::default()
            }),
            resources: Some(ResourceRequirements::default()),
            ..Default::default()
        };
        let row = project(&container_summary(&c)).unwrap();
        assert_eq!(row["name"], "calico-node");
        assert_eq!(row["privileged"], "1");
        assert_eq!(row["stdin"], "0");
        assert_eq!(row["tty"], "0");
        assert!(!row.contains_key("command"));
        assert!(!row.contains_key("env"));
        assert!(!row.contains_key("resources"));
    }

    #[test]
    fn test_working_dir_env_from_and_startup_probe() {
        let c: Container = serde_json::from_value(json!({
            "name": "api",
            "workingDir": "/srv",
            "envFrom": [{"configMapRef": {"name": "api-env"}}],
            "startupProbe": {"httpGet": {"path": "/healthz", "port": 8080}, "failureThreshold": 30},
        }))
        .unwrap();
        let row = project(&container_summary(&c)).unwrap();
        assert_eq!(row["working_dir"], "/srv");
        assert_eq!(row["env_from"], r#"[{"configMapRef":{"name":"api-env"}}]"#);
        assert_eq!(
            row["startup_probe"],
            r#"{"failureThreshold":30,"httpGet":{"path":"/healthz","port":8080}}"#
        );

        let row = project(&container_summary(&named("bare"))).unwrap();
        assert!(!row.contains_key("working_dir"));
        assert!(!row.contains_key("env_from"));
        assert!(!row.contains_key("startup_probe"));
    }

    #[test]
    fn test_container_type_strings() {
        assert_eq!(ContainerType::Init.to_string(), "init");
        assert_eq!(ContainerType::Container.to_string(), "container");
        assert_eq!(ContainerType::Ephemeral.to_string(), "ephemeral");
    }
}
