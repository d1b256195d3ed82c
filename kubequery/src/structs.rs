use std::collections::BTreeMap;
use std::fmt;

use k8s_openapi::serde_json::{Map, Value};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// One projected row: column name to scalar string.
pub type Row = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SqlKind {
    Text,
    Integer,
    BigInt,
}

impl fmt::Display for SqlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SqlKind::Text => "TEXT",
            SqlKind::Integer => "INTEGER",
            SqlKind::BigInt => "BIGINT",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: SqlKind,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: SqlKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Per-call context handed in by the host. Cancelling it aborts pagination
/// at the next list boundary.
#[derive(Debug, Clone, Default)]
pub struct HostContext {
    cancel: CancellationToken,
}

impl HostContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// Opaque query constraints forwarded by the host. Not interpreted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QueryContext {
    pub constraints: Map<String, Value>,
}
