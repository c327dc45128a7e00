//! Force simulation primitive behind the relayout engine.
//!
//! [`ForceGraphSimulator`] lets `force_graph` integrate many-body charge with
//! velocity and damping, then runs three position-correction passes per tick:
//! link springs, collision and centering, in that order. No randomness is
//! involved, so equal inputs give equal outputs.
//!
//! Positions are kept in `f64`; `force_graph` works in `f32`, so only the
//! displacement it produces in a tick is carried back.

use std::f64::consts::PI;

use force_graph::{ForceGraph, NodeData, SimulationParameters};

use super::types::Position;

/// A force simulation over a fixed set of nodes addressed by input index.
///
/// `apply_*` register a force; `step` integrates with all registered forces.
pub trait ForceSimulator {
	/// Seeds the simulation; index `i` of every later call refers to `positions[i]`.
	fn from_positions(positions: &[Position]) -> Self;

	/// Many-body force; negative strength repels.
	fn apply_repulsion(&mut self, strength: f64);

	/// Springs between node indices with rest length `distance`.
	fn apply_link_spring(&mut self, links: &[(usize, usize)], distance: f64);

	/// Keep node centres at least `radius` apart.
	fn apply_collision(&mut self, radius: f64);

	/// Translate the layout so its centroid sits on `center`.
	fn apply_centering(&mut self, center: Position);

	/// Advance exactly `ticks` integration steps.
	fn step(&mut self, ticks: usize);

	/// Current positions, in seed order.
	fn read_positions(&self) -> Vec<Position>;
}

const TICK: f32 = 0.016;
const NODE_MASS: f32 = 10.0;
/// Maps a repulsion strength onto `force_graph` charge; -1000 becomes 150.
const CHARGE_SCALE: f64 = 0.15;
/// Share of the spring error corrected per tick.
const SPRING_RATE: f64 = 0.5;
/// Offset used to pull apart nodes that share a position.
const JITTER: f64 = 1.0;
/// Jitter grows with coordinate magnitude so it stays above one ulp.
const JITTER_RELATIVE: f64 = 1e-12;
const MAX_JITTER_ATTEMPTS: usize = 64;
const GOLDEN_ANGLE: f64 = PI * 0.763_932_022_500_210_3;
/// Coordinates handed to `force_graph` are clamped to this magnitude.
const GRAPH_LIMIT: f64 = 1e18;

#[derive(Clone, Copy, Debug)]
struct Spring {
	source: usize,
	target: usize,
	/// Share of the correction the target takes; the busier end moves less.
	bias: f64,
	strength: f64,
}

/// [`ForceSimulator`] backed by the `force_graph` crate.
pub struct ForceGraphSimulator {
	positions: Vec<(f64, f64)>,
	graph: Option<ForceGraph<usize, ()>>,
	/// What each node was last set to inside `graph`.
	mirror: Vec<(f32, f32)>,
	charge: f32,
	springs: Vec<Spring>,
	spring_length: f64,
	collision_radius: Option<f64>,
	center: Option<(f64, f64)>,
}

impl ForceSimulator for ForceGraphSimulator {
	fn from_positions(positions: &[Position]) -> Self {
		let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
		let mut seeded: Vec<(f64, f64)> = positions
			.iter()
			.map(|p| (finite(p.x), finite(p.y)))
			.collect();
		separate_coincident(&mut seeded);
		Self {
			positions: seeded,
			graph: None,
			mirror: Vec::new(),
			charge: 0.0,
			springs: Vec::new(),
			spring_length: 0.0,
			collision_radius: None,
			center: None,
		}
	}

	fn apply_repulsion(&mut self, strength: f64) {
		self.charge = (-strength * CHARGE_SCALE) as f32;
		// Charge is fixed when the graph is built.
		self.graph = None;
	}

	fn apply_link_spring(&mut self, links: &[(usize, usize)], distance: f64) {
		let n = self.positions.len();
		let links: Vec<(usize, usize)> = links
			.iter()
			.copied()
			.filter(|&(s, t)| s < n && t < n && s != t)
			.collect();

		let mut degree = vec![0u32; n];
		for &(s, t) in &links {
			degree[s] += 1;
			degree[t] += 1;
		}
		self.springs = links
			.into_iter()
			.map(|(source, target)| {
				let (ds, dt) = (degree[source] as f64, degree[target] as f64);
				Spring {
					source,
					target,
					bias: ds / (ds + dt),
					strength: 1.0 / ds.min(dt),
				}
			})
			.collect();
		self.spring_length = distance.max(0.0);
	}

	fn apply_collision(&mut self, radius: f64) {
		self.collision_radius = (radius > 0.0).then_some(radius);
	}

	fn apply_centering(&mut self, center: Position) {
		self.center = Some((center.x, center.y));
	}

	fn step(&mut self, ticks: usize) {
		if self.positions.is_empty() {
			return;
		}
		for _ in 0..ticks {
			self.tick();
		}
	}

	fn read_positions(&self) -> Vec<Position> {
		self.positions
			.iter()
			.map(|&(x, y)| Position::new(x, y))
			.collect()
	}
}

impl ForceGraphSimulator {
	fn graph(&mut self) -> &mut ForceGraph<usize, ()> {
		if self.graph.is_none() {
			self.mirror = self.positions.iter().map(|&p| to_graph(p)).collect();
		}
		self.graph
			.get_or_insert_with(|| build_graph(&self.mirror, self.charge))
	}

	fn tick(&mut self) {
		let previous = self.positions.clone();
		let mut moved = self.mirror_after_update();
		let mut diverged = false;

		let mut next = previous.clone();
		for (i, p) in next.iter_mut().enumerate() {
			let (gx, gy) = moved[i];
			let (mx, my) = self.mirror[i];
			let (dx, dy) = ((gx - mx) as f64, (gy - my) as f64);
			if dx.is_finite() && dy.is_finite() {
				p.0 += dx;
				p.1 += dy;
			} else {
				diverged = true;
			}
		}

		self.pull_springs(&mut next);
		self.collide(&mut next);
		self.recenter(&mut next);

		for (p, prev) in next.iter_mut().zip(&previous) {
			if !p.0.is_finite() || !p.1.is_finite() {
				*p = *prev;
				diverged = true;
			}
		}

		if diverged {
			// Velocities are poisoned too; start over from the repaired positions.
			self.graph = None;
		} else if let Some(graph) = self.graph.as_mut() {
			for (m, &p) in moved.iter_mut().zip(&next) {
				*m = to_graph(p);
			}
			graph.visit_nodes_mut(|node| {
				let (x, y) = moved[node.data.user_data];
				node.data.x = x;
				node.data.y = y;
			});
			self.mirror = moved;
		}
		self.positions = next;
	}

	/// Runs one `force_graph` update and returns where it left every node.
	fn mirror_after_update(&mut self) -> Vec<(f32, f32)> {
		let graph = self.graph();
		graph.update(TICK);
		let mut moved = vec![(0.0, 0.0); self.mirror.len()];
		if let Some(graph) = self.graph.as_ref() {
			graph.visit_nodes(|node| {
				moved[node.data.user_data] = (node.x(), node.y());
			});
		}
		moved
	}

	fn pull_springs(&self, positions: &mut [(f64, f64)]) {
		for spring in &self.springs {
			let (sx, sy) = positions[spring.source];
			let (tx, ty) = positions[spring.target];
			let (dx, dy) = (tx - sx, ty - sy);
			let dist = dx.hypot(dy);
			if dist < f64::EPSILON {
				continue;
			}
			let l = (dist - self.spring_length) / dist * spring.strength * SPRING_RATE;
			let (cx, cy) = (dx * l, dy * l);
			positions[spring.target].0 -= cx * spring.bias;
			positions[spring.target].1 -= cy * spring.bias;
			positions[spring.source].0 += cx * (1.0 - spring.bias);
			positions[spring.source].1 += cy * (1.0 - spring.bias);
		}
	}

	fn collide(&self, positions: &mut [(f64, f64)]) {
		let Some(radius) = self.collision_radius else {
			return;
		};
		for i in 0..positions.len() {
			for j in (i + 1)..positions.len() {
				let (dx, dy) = (
					positions[j].0 - positions[i].0,
					positions[j].1 - positions[i].1,
				);
				let dist = dx.hypot(dy);
				if dist >= radius {
					continue;
				}
				let (ux, uy) = if dist > f64::EPSILON {
					(dx / dist, dy / dist)
				} else {
					jiggle(i + j)
				};
				let push = (radius - dist) / 2.0;
				positions[i].0 -= ux * push;
				positions[i].1 -= uy * push;
				positions[j].0 += ux * push;
				positions[j].1 += uy * push;
			}
		}
	}

	fn recenter(&self, positions: &mut [(f64, f64)]) {
		let Some((cx, cy)) = self.center else {
			return;
		};
		// Mean taken incrementally so huge coordinates do not overflow the sum.
		let (mx, my) = positions
			.iter()
			.enumerate()
			.fold((0.0, 0.0), |(ax, ay), (i, &(x, y))| {
				let k = (i + 1) as f64;
				(ax + (x - ax) / k, ay + (y - ay) / k)
			});
		let (shift_x, shift_y) = (cx - mx, cy - my);
		for p in positions.iter_mut() {
			p.0 += shift_x;
			p.1 += shift_y;
		}
	}
}

fn to_graph((x, y): (f64, f64)) -> (f32, f32) {
	(
		x.clamp(-GRAPH_LIMIT, GRAPH_LIMIT) as f32,
		y.clamp(-GRAPH_LIMIT, GRAPH_LIMIT) as f32,
	)
}

fn build_graph(positions: &[(f32, f32)], charge: f32) -> ForceGraph<usize, ()> {
	let mut graph = ForceGraph::new(SimulationParameters {
		force_charge: charge,
		force_spring: 0.0,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	});
	for (index, &(x, y)) in positions.iter().enumerate() {
		graph.add_node(NodeData {
			x,
			y,
			mass: NODE_MASS,
			is_anchor: false,
			user_data: index,
		});
	}
	graph
}

fn jiggle(index: usize) -> (f64, f64) {
	let angle = index as f64 * GOLDEN_ANGLE;
	(angle.cos(), angle.sin())
}

/// Nudges every node that shares its position with an earlier node along a
/// golden-angle spiral, so no two nodes start on top of each other.
fn separate_coincident(positions: &mut [(f64, f64)]) {
	for i in 1..positions.len() {
		let (x, y) = positions[i];
		let scale = JITTER.max(x.abs().max(y.abs()) * JITTER_RELATIVE);
		for attempt in 1..=MAX_JITTER_ATTEMPTS {
			if !positions[..i].contains(&positions[i]) {
				break;
			}
			let (jx, jy) = jiggle(i + attempt);
			let reach = scale * attempt as f64;
			positions[i] = (x + jx * reach, y + jy * reach);
		}
	}
}
