use std::collections::HashMap;

use crate::layout::{
	ClusterLayout, ClusteringResult, GraphNode, NodeKind, Position, RelayoutConfig, Size,
	build_cluster_nodes, relayout,
};

/// Document leaves are drawn as circles that fill the zig-zag clearance.
pub const CHILD_RADIUS: f64 = 20.0;
/// Height of the clickable strip above a topic box that carries its caption.
pub const LABEL_HEIGHT: f64 = 30.0;

/// Screen = graph * `k` + (`x`, `y`).
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	/// Horizontal pan in screen pixels.
	pub x: f64,
	/// Vertical pan in screen pixels.
	pub y: f64,
	/// Zoom factor.
	pub k: f64,
}

/// An in-progress node drag.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	/// Whether a drag is under way.
	pub active: bool,
	/// Index of the dragged node.
	pub node: Option<usize>,
	/// Screen x where the drag started.
	pub start_x: f64,
	/// Screen y where the drag started.
	pub start_y: f64,
	/// The node's stored position when the drag started.
	pub node_start: Position,
}

/// An in-progress background pan.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// Whether a pan is under way.
	pub active: bool,
	/// Screen x where the pan started.
	pub start_x: f64,
	/// Screen y where the pan started.
	pub start_y: f64,
	/// `ViewTransform::x` when the pan started.
	pub transform_start_x: f64,
	/// `ViewTransform::y` when the pan started.
	pub transform_start_y: f64,
}

/// Hover target and its eased highlight.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	/// Node under the cursor.
	pub node: Option<usize>,
	/// Group of the hovered node, or the node itself when it is a group.
	pub group: Option<usize>,
	/// Highlight progress in `0..=1`, eased by [`ClusterGraphState::tick`].
	pub highlight_t: f64,
}

/// Everything the canvas needs between frames.
pub struct ClusterGraphState {
	/// Flat node arena as built by the cluster builder.
	pub nodes: Vec<GraphNode>,
	index: HashMap<String, usize>,
	/// Current pan and zoom.
	pub transform: ViewTransform,
	/// Node drag, if any.
	pub drag: DragState,
	/// Background pan, if any.
	pub pan: PanState,
	/// Hover target.
	pub hover: HoverState,
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
}

fn index_of(nodes: &[GraphNode]) -> HashMap<String, usize> {
	let mut index = HashMap::with_capacity(nodes.len());
	for (i, node) in nodes.iter().enumerate() {
		index.entry(node.id.clone()).or_insert(i);
	}
	index
}

/// Builds the nodes for `clustering`, optionally spreading the topic boxes
/// with a force relayout centred on a `width` x `height` surface.
pub fn layout_nodes(
	clustering: &ClusteringResult,
	relayout_groups: bool,
	width: f64,
	height: f64,
) -> Vec<GraphNode> {
	let mut nodes = build_cluster_nodes(Some(clustering), &ClusterLayout::default());
	if !relayout_groups {
		return nodes;
	}

	let groups: Vec<GraphNode> = nodes
		.iter()
		.filter(|n| n.kind == NodeKind::Group)
		.cloned()
		.collect();
	let radius = groups
		.iter()
		.filter_map(|g| g.size)
		.map(|s| s.width.max(s.height))
		.fold(0.0, f64::max);
	let config = RelayoutConfig {
		radius,
		..RelayoutConfig::default()
	}
	.with_viewport(width, height);
	let settled: HashMap<String, Position> = relayout(&groups, &[], &config)
		.nodes
		.into_iter()
		.map(|g| (g.id, g.position))
		.collect();

	// Children are parent-relative and follow their group.
	for node in nodes.iter_mut().filter(|n| n.kind == NodeKind::Group) {
		if let Some(&position) = settled.get(&node.id) {
			node.position = position;
		}
	}
	nodes
}

impl ClusterGraphState {
	/// State for `nodes` on a `width` x `height` canvas, unpanned and unzoomed.
	pub fn new(nodes: Vec<GraphNode>, width: f64, height: f64) -> Self {
		Self {
			index: index_of(&nodes),
			nodes,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
		}
	}

	/// Swaps in a new node set. Pan and zoom survive; drag and hover referred
	/// to old indices and are dropped.
	pub fn replace_nodes(&mut self, nodes: Vec<GraphNode>) {
		self.index = index_of(&nodes);
		self.nodes = nodes;
		self.drag = DragState::default();
		self.hover = HoverState::default();
	}

	/// Index of the node's parent; the first node with that id wins.
	pub fn parent(&self, idx: usize) -> Option<usize> {
		let parent_id = self.nodes[idx].parent_id.as_deref()?;
		self.index.get(parent_id).copied().filter(|&p| p != idx)
	}

	/// Position in graph space, resolved through the parent chain.
	pub fn absolute_position(&self, idx: usize) -> Position {
		let mut position = self.nodes[idx].position;
		let mut current = idx;
		// Bounded walk; a malformed parent cycle must not hang the frame.
		for _ in 0..self.nodes.len() {
			let Some(parent) = self.parent(current) else {
				break;
			};
			let offset = self.nodes[parent].position;
			position.x += offset.x;
			position.y += offset.y;
			current = parent;
		}
		position
	}

	/// Top-left corner and extent of the node's hit box in graph space.
	pub fn bounds(&self, idx: usize) -> (Position, Size) {
		let node = &self.nodes[idx];
		let origin = self.absolute_position(idx);
		let size = match node.kind {
			NodeKind::Group => node.size.unwrap_or_default(),
			NodeKind::GroupChild => Size {
				width: 2.0 * CHILD_RADIUS,
				height: 2.0 * CHILD_RADIUS,
			},
			NodeKind::GroupLabel => Size {
				width: self
					.parent(idx)
					.and_then(|p| self.nodes[p].size)
					.map(|s| s.width)
					.unwrap_or(0.0),
				height: LABEL_HEIGHT,
			},
		};
		(origin, size)
	}

	/// Inverse of the view transform.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under the cursor: leaves beat captions, captions beat boxes.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let rank = |kind: NodeKind| match kind {
			NodeKind::GroupChild => 0,
			NodeKind::GroupLabel => 1,
			NodeKind::Group => 2,
		};
		let mut found: Option<usize> = None;
		for idx in (0..self.nodes.len()).rev() {
			if !self.hit(idx, gx, gy) {
				continue;
			}
			let better = found
				.map(|f| rank(self.nodes[idx].kind) < rank(self.nodes[f].kind))
				.unwrap_or(true);
			if better {
				found = Some(idx);
			}
		}
		found
	}

	fn hit(&self, idx: usize, gx: f64, gy: f64) -> bool {
		let (origin, size) = self.bounds(idx);
		if self.nodes[idx].kind == NodeKind::GroupChild {
			let (dx, dy) = (gx - origin.x - CHILD_RADIUS, gy - origin.y - CHILD_RADIUS);
			return (dx * dx + dy * dy).sqrt() <= CHILD_RADIUS;
		}
		gx >= origin.x && gx <= origin.x + size.width && gy >= origin.y && gy <= origin.y + size.height
	}

	/// Sets the hovered node and resolves its group.
	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		self.hover.node = node;
		self.hover.group = node.and_then(|idx| match self.nodes[idx].kind {
			NodeKind::Group => Some(idx),
			_ => self.parent(idx),
		});
	}

	/// Whether `idx` is the hovered node or shares its group.
	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.group.is_some_and(|g| g == idx || self.parent(idx) == Some(g))
	}

	/// True while hovering or while the highlight fades out.
	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.highlight_t > 0.0
	}

	/// Starts dragging `idx` from screen point (`sx`, `sy`).
	pub fn begin_drag(&mut self, idx: usize, sx: f64, sy: f64) {
		self.drag = DragState {
			active: true,
			node: Some(idx),
			start_x: sx,
			start_y: sy,
			node_start: self.nodes[idx].position,
		};
	}

	/// Moves the dragged node; confined nodes stay inside their parent box.
	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.drag.node.filter(|_| self.drag.active) else {
			return;
		};
		let k = self.transform.k;
		let mut position = Position::new(
			self.drag.node_start.x + (sx - self.drag.start_x) / k,
			self.drag.node_start.y + (sy - self.drag.start_y) / k,
		);
		if self.nodes[idx].confined_to_parent {
			position = self.clamp_to_parent(idx, position);
		}
		self.nodes[idx].position = position;
	}

	/// Keeps `position` such that the node's box lies inside its parent's.
	pub fn clamp_to_parent(&self, idx: usize, position: Position) -> Position {
		let Some(parent_size) = self.parent(idx).and_then(|p| self.nodes[p].size) else {
			return position;
		};
		let (_, size) = self.bounds(idx);
		let max_x = (parent_size.width - size.width).max(0.0);
		let max_y = (parent_size.height - size.height).max(0.0);
		Position::new(position.x.clamp(0.0, max_x), position.y.clamp(0.0, max_y))
	}

	/// Starts panning from screen point (`sx`, `sy`).
	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	/// Moves the view with the cursor while panning.
	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}
	}

	/// Ends any drag or pan.
	pub fn release(&mut self) {
		self.drag.active = false;
		self.drag.node = None;
		self.pan.active = false;
	}

	/// Zooms around the cursor; positive `delta_y` zooms out.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Eases the hover highlight over `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		let (target, speed) = if self.hover.node.is_some() {
			(1.0, 1.8)
		} else {
			(0.0, 1.26)
		};
		self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
		if self.hover.node.is_none() && self.hover.highlight_t < 0.01 {
			self.hover.highlight_t = 0.0;
			self.hover.group = None;
		}
	}

	/// Records a new canvas size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::{DocumentRef, Topic};

	fn clustering() -> ClusteringResult {
		let topic = |id: &str, docs: &[&str]| Topic {
			id: id.into(),
			title: id.to_uppercase(),
			documents: docs
				.iter()
				.map(|d| DocumentRef {
					id: (*d).into(),
					title: None,
					file_name: format!("{d}.pdf"),
				})
				.collect(),
		};
		ClusteringResult {
			id: "c".into(),
			title: "C".into(),
			topics: vec![topic("t1", &["d1", "d2", "d3"]), topic("t2", &["d4"])],
		}
	}

	fn state() -> ClusterGraphState {
		ClusterGraphState::new(layout_nodes(&clustering(), false, 800.0, 600.0), 800.0, 600.0)
	}

	fn idx(state: &ClusterGraphState, id: &str) -> usize {
		state.nodes.iter().position(|n| n.id == id).unwrap()
	}

	#[test]
	fn children_resolve_against_their_group() {
		let s = state();
		assert_eq!(s.absolute_position(idx(&s, "d2")), Position::new(450.0, 300.0));
		assert_eq!(s.absolute_position(idx(&s, "t2-label")), Position::new(500.0, 60.0));
		assert_eq!(s.absolute_position(idx(&s, "t1")), Position::new(100.0, 100.0));
	}

	#[test]
	fn hit_testing_prefers_leaves() {
		let s = state();
		// Centre of d1: group origin + offset + radius.
		assert_eq!(s.node_at_position(130.0, 170.0), Some(idx(&s, "d1")));
		assert_eq!(s.node_at_position(300.0, 400.0), Some(idx(&s, "t1")));
		assert_eq!(s.node_at_position(150.0, 70.0), Some(idx(&s, "t1-label")));
		assert_eq!(s.node_at_position(50.0, 50.0), None);
	}

	#[test]
	fn confined_drag_stays_inside_parent() {
		let mut s = state();
		let d1 = idx(&s, "d1");
		s.begin_drag(d1, 130.0, 170.0);
		s.drag_to(2000.0, -500.0);
		assert_eq!(s.nodes[d1].position, Position::new(360.0, 0.0));
		s.release();
		assert!(!s.drag.active);
	}

	#[test]
	fn dragging_a_group_carries_children() {
		let mut s = state();
		let t2 = idx(&s, "t2");
		let d4 = idx(&s, "d4");
		let before = s.absolute_position(d4);
		s.begin_drag(t2, 600.0, 300.0);
		s.drag_to(650.0, 320.0);
		let after = s.absolute_position(d4);
		assert_eq!(after, Position::new(before.x + 50.0, before.y + 20.0));
	}

	#[test]
	fn hover_highlights_the_whole_group() {
		let mut s = state();
		s.set_hover(Some(idx(&s, "d1")));
		assert!(s.is_highlighted(idx(&s, "t1")));
		assert!(s.is_highlighted(idx(&s, "d3")));
		assert!(!s.is_highlighted(idx(&s, "d4")));
		s.set_hover(None);
		for _ in 0..600 {
			s.tick(0.016);
		}
		assert!(!s.has_active_highlight());
	}

	#[test]
	fn zoom_keeps_cursor_fixed() {
		let mut s = state();
		let before = s.screen_to_graph(200.0, 150.0);
		s.zoom_at(200.0, 150.0, -1.0);
		let after = s.screen_to_graph(200.0, 150.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
		assert!(s.transform.k > 1.0);
	}

	#[test]
	fn relayout_only_moves_groups() {
		let plain = layout_nodes(&clustering(), false, 800.0, 600.0);
		let spread = layout_nodes(&clustering(), true, 800.0, 600.0);
		assert_eq!(plain.len(), spread.len());
		for (a, b) in plain.iter().zip(&spread) {
			if a.kind != NodeKind::Group {
				assert_eq!(a, b);
			}
		}
		let cx = spread
			.iter()
			.filter(|n| n.kind == NodeKind::Group)
			.map(|n| n.position.x)
			.sum::<f64>()
			/ 2.0;
		assert!((cx - 400.0).abs() < 0.1);
	}

	#[test]
	fn replacing_nodes_keeps_the_view() {
		let mut s = state();
		s.zoom_at(200.0, 150.0, -1.0);
		let transform = s.transform.clone();
		let d1 = idx(&s, "d1");
		s.set_hover(Some(d1));
		s.begin_drag(d1, 130.0, 170.0);

		let mut smaller = clustering();
		smaller.topics.truncate(1);
		s.replace_nodes(layout_nodes(&smaller, false, 800.0, 600.0));

		assert_eq!(s.nodes.len(), 5);
		assert!(!s.drag.active && s.drag.node.is_none());
		assert!(s.hover.node.is_none() && !s.has_active_highlight());
		assert_eq!((s.transform.x, s.transform.y, s.transform.k), (transform.x, transform.y, transform.k));
		assert!(!s.index.contains_key("t2"));
		assert_eq!(s.absolute_position(idx(&s, "d2")), Position::new(450.0, 300.0));
	}
}
