pub mod cluster;
pub mod list;
