//! Interactive canvas components.

pub mod cluster_graph;
