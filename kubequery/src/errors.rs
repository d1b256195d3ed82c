use k8s_openapi::serde_json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the host by schema and generate calls.
#[derive(Debug, Error)]
pub enum Error {
    #[error("list request failed: {0}")]
    Transport(#[from] kube::Error),

    #[error("query cancelled by host")]
    Cancelled,

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error("could not decode {kind}: {source}")]
    Decode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not load cluster credentials: {0}")]
    Kubeconfig(String),

    #[error("cluster state already initialised")]
    AlreadyInitialized,

    #[error("cluster state not initialised")]
    NotInitialized,

    #[error("no such table: {0}")]
    UnknownTable(String),

    #[error("could not start runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// A nested composite that could not be encoded as canonical JSON.
#[derive(Debug, Error)]
#[error("could not encode column {column}: {source}")]
pub struct ProjectionError {
    pub column: String,
    #[source]
    pub source: serde_json::Error,
}
