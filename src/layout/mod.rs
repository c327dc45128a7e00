//! Target-independent graph layout: the clustering-to-nodes builder and the
//! force relayout engine. Nothing here touches the DOM.

mod cluster;
mod config;
mod error;
mod relayout;
mod simulator;
mod types;

pub use cluster::{
	build_cluster_nodes, build_cluster_nodes_from_json, build_cluster_nodes_from_value,
	find_duplicate_ids,
};
pub use config::{ClusterLayout, DEFAULT_CENTER, RelayoutConfig, Viewport};
pub use error::ClusterDataError;
pub use relayout::{LayoutNode, Relayout, relayout, relayout_with};
pub use simulator::{ForceGraphSimulator, ForceSimulator};
pub use types::{ClusteringResult, DocumentRef, GraphEdge, GraphNode, NodeKind, Position, Size, Topic};
