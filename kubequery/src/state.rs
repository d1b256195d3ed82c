use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::info;

use crate::cmd::cluster::{cluster_uid, connect, BootstrapConfig};
use crate::cmd::list::{KubePager, Pager};
use crate::errors::{Error, Result};

static STATE: OnceLock<Arc<ClusterState>> = OnceLock::new();

/// What every generator reads: a way to list the cluster and the cluster's
/// uid. Immutable once built.
pub struct ClusterState {
    pager: Arc<dyn Pager>,
    cluster_uid: String,
}

impl ClusterState {
    pub fn new(pager: Arc<dyn Pager>, cluster_uid: impl Into<String>) -> Self {
        Self {
            pager,
            cluster_uid: cluster_uid.into(),
        }
    }

    pub async fn connect(cfg: &BootstrapConfig) -> Result<Self> {
        let client = connect(cfg).await?;
        let uid = cluster_uid(&client).await?;
        info!(cluster_uid = %uid, "cluster state ready");
        Ok(Self::new(Arc::new(KubePager::new(client)), uid))
    }

    pub fn pager(&self) -> &dyn Pager {
        self.pager.as_ref()
    }

    pub fn cluster_uid(&self) -> &str {
        &self.cluster_uid
    }
}

impl fmt::Debug for ClusterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterState")
            .field("cluster_uid", &self.cluster_uid)
            .finish_non_exhaustive()
    }
}

/// Installs the process-wide state. Only the first call wins.
pub fn install(state: ClusterState) -> Result<Arc<ClusterState>> {
    let state = Arc::new(state);
    STATE
        .set(state.clone())
        .map_err(|_| Error::AlreadyInitialized)?;
    Ok(state)
}

pub fn installed() -> Result<Arc<ClusterState>> {
    STATE.get().cloned().ok_or(Error::NotInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::testing::FakePager;

    #[test]
    fn test_install_is_write_once() {
        let first = install(ClusterState::new(Arc::new(FakePager::default()), "blah")).unwrap();
        assert_eq!(first.cluster_uid(), "blah");
        assert_eq!(installed().unwrap().cluster_uid(), "blah");

        let second = install(ClusterState::new(Arc::new(FakePager::default()), "other"));
        assert!(matches!(second, Err(Error::AlreadyInitialized)));
        assert_eq!(installed().unwrap().cluster_uid(), "blah");
    }
}
