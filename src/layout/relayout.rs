//! One-shot force relayout of an arbitrary node/edge list.

use std::collections::HashMap;

use log::debug;

use super::config::RelayoutConfig;
use super::simulator::{ForceGraphSimulator, ForceSimulator};
use super::types::{GraphEdge, GraphNode, Position};

/// Anything the relayout engine can move.
pub trait LayoutNode {
	/// Key that edges refer to.
	fn id(&self) -> &str;
	/// Seed position.
	fn position(&self) -> Position;
	/// Stores the settled position.
	fn set_position(&mut self, position: Position);
}

impl LayoutNode for GraphNode {
	fn id(&self) -> &str {
		&self.id
	}

	fn position(&self) -> Position {
		self.position
	}

	fn set_position(&mut self, position: Position) {
		self.position = position;
	}
}

/// Settled nodes plus a copy of the edges they were laid out with.
#[derive(Clone, Debug, PartialEq)]
pub struct Relayout<N> {
	/// Input nodes, in input order, with settled positions.
	pub nodes: Vec<N>,
	/// The input edges, unchanged.
	pub edges: Vec<GraphEdge>,
}

/// Runs [`relayout_with`] on a [`ForceGraphSimulator`].
pub fn relayout<N>(nodes: &[N], edges: &[GraphEdge], config: &RelayoutConfig) -> Relayout<N>
where
	N: LayoutNode + Clone,
{
	relayout_with::<ForceGraphSimulator, N>(nodes, edges, config)
}

/// Simulates repulsion, edge springs, collision and centering for exactly
/// `config.iterations` ticks and returns copies of `nodes` with their settled
/// positions. Node order and every other field are preserved. Edges that name
/// unknown nodes or loop back to their source take no part but are returned.
pub fn relayout_with<S, N>(nodes: &[N], edges: &[GraphEdge], config: &RelayoutConfig) -> Relayout<N>
where
	S: ForceSimulator,
	N: LayoutNode + Clone,
{
	let edges = edges.to_vec();
	if nodes.is_empty() {
		return Relayout {
			nodes: Vec::new(),
			edges,
		};
	}

	let index: HashMap<&str, usize> = nodes
		.iter()
		.enumerate()
		.map(|(i, node)| (node.id(), i))
		.collect();
	let links: Vec<(usize, usize)> = edges
		.iter()
		.filter_map(|edge| {
			let source = *index.get(edge.source.as_str())?;
			let target = *index.get(edge.target.as_str())?;
			(source != target).then_some((source, target))
		})
		.collect();

	let seed: Vec<Position> = nodes.iter().map(LayoutNode::position).collect();
	let mut simulator = S::from_positions(&seed);
	simulator.apply_repulsion(config.strength);
	simulator.apply_link_spring(&links, config.distance);
	simulator.apply_collision(config.radius);
	simulator.apply_centering(config.center());
	simulator.step(config.iterations);

	let nodes = nodes
		.iter()
		.zip(simulator.read_positions())
		.map(|(node, position)| {
			let mut node = node.clone();
			node.set_position(position);
			node
		})
		.collect::<Vec<_>>();
	debug!(
		"relaid {} nodes over {} links in {} ticks",
		nodes.len(),
		links.len(),
		config.iterations
	);
	Relayout { nodes, edges }
}
