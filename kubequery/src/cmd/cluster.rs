use k8s_openapi::api::core::v1::Namespace;
use kube::config::KubeConfigOptions;
use kube::{Api, Client, Config};
use tracing::info;

use crate::errors::{Error, Result};

/// The namespace whose uid stands in for the cluster's identity.
const IDENTITY_NAMESPACE: &str = "kube-system";

/// Outer bootstrap settings.
#[derive(Debug, Clone, Default)]
pub struct BootstrapConfig {
    /// Kubeconfig context to use. `None` infers: in-cluster service account
    /// first, then `KUBECONFIG` / `~/.kube/config`.
    pub context: Option<String>,
}

#[tracing::instrument]
pub async fn connect(cfg: &BootstrapConfig) -> Result<Client> {
    let config = match &cfg.context {
        Some(context) => {
            let options = KubeConfigOptions {
                context: Some(context.clone()),
                cluster: None,
                user: None,
            };
            Config::from_kubeconfig(&options)
                .await
                .map_err(|e| Error::Kubeconfig(e.to_string()))?
        }
        None => Config::infer()
            .await
            .map_err(|e| Error::Kubeconfig(e.to_string()))?,
    };
    info!(cluster_url = %config.cluster_url, "connecting");
    Client::try_from(config).map_err(Error::Transport)
}

#[tracing::instrument(skip(client))]
pub async fn cluster_uid(client: &Client) -> Result<String> {
    let namespaces: Api<Namespace> = Api::all(client.clone());
    let namespace = namespaces.get(IDENTITY_NAMESPACE).await?;
    Ok(namespace.metadata.uid.unwrap_or_default())
}
