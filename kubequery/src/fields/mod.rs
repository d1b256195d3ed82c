//! Field bundles shared by every kind: object meta, pod-spec summary,
//! container summary and volume summary.

pub mod container;
pub mod meta;
pub mod pod;
pub mod volume;

pub use container::{pod_containers, ContainerSummary, ContainerType};
pub use meta::{cluster_meta, namespaced_meta, ClusterMeta, NamespacedMeta};
pub use pod::{pod_summary, PodSummary};
pub use volume::{pod_volumes, volume_summary, VolumeSummary};
