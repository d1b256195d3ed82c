pub mod cronjob;
pub mod daemonset;
pub mod deployment;
pub mod job;
pub mod namespace;
pub mod node;
pub mod pod;
pub mod processor;
pub mod replicaset;
pub mod statefulset;

mod kind;

#[cfg(test)]
pub(crate) mod testing;

pub use kind::{columns, table_names, TableRegistry};
