//! Force layout engine: link attraction, many-body repulsion, centering,
//! and per-kind collision, integrated under an alpha cooling schedule.

use std::collections::HashMap;

use super::types::{Edge, EdgeKey, Node, NodeKind};

const LINK_DISTANCE: f64 = 120.0;
const LINK_STRENGTH: f64 = 0.5;
const CHARGE_STRENGTH: f64 = -400.0;
const CHARGE_DISTANCE_MAX: f64 = 300.0;
const CENTER_STRENGTH: f64 = 0.1;
const COLLISION_STRENGTH: f64 = 0.7;
/// Velocities keep this fraction of their magnitude each tick.
const VELOCITY_DECAY: f64 = 0.6;
/// Ticks stop once alpha falls below this with a zero target.
const ALPHA_MIN: f64 = 0.001;
/// Relaxation rate of alpha toward its target (d3's default schedule:
/// alpha reaches ALPHA_MIN from 1.0 in roughly 300 ticks).
const ALPHA_DECAY: f64 = 0.0228;
/// Raised alpha target while a drag is in progress.
const DRAG_ALPHA_TARGET: f64 = 0.3;
/// Distances below this are clamped to avoid exploding forces.
const MIN_DISTANCE: f64 = 1.0;

/// A node's transient layout state. Lives only inside the simulation;
/// positions never leak back into the normalized [`Node`].
#[derive(Clone, Debug)]
pub struct LayoutNode {
	pub id: String,
	pub name: String,
	pub kind: NodeKind,
	pub x: f64,
	pub y: f64,
	vx: f64,
	vy: f64,
	pin: Option<(f64, f64)>,
}

impl LayoutNode {
	pub fn pinned(&self) -> bool {
		self.pin.is_some()
	}
}

/// An edge resolved to node indices for the link force and rendering.
#[derive(Clone, Debug)]
pub struct LayoutLink {
	pub source: usize,
	pub target: usize,
	pub kind: String,
	pub key: EdgeKey,
}

/// One physics simulation over one filtered node/edge set.
///
/// The owner must build a fresh instance whenever the input set changes
/// and let the old one drop — two simulations must never tick against
/// the same render surface.
pub struct Simulation {
	nodes: Vec<LayoutNode>,
	index: HashMap<String, usize>,
	links: Vec<LayoutLink>,
	width: f64,
	height: f64,
	alpha: f64,
	alpha_target: f64,
	running: bool,
}

impl Simulation {
	/// Build a simulation with nodes scattered inside the canvas bounds.
	///
	/// The scatter is seeded from each node id, so the same entity lands
	/// on the same starting spot across refreshes of identical data and
	/// the layout does not re-shuffle on every poll. Edges with an
	/// endpoint missing from `nodes` are dropped.
	pub fn new(nodes: &[Node], edges: &[Edge], width: f64, height: f64) -> Self {
		let margin = 40.0_f64.min(width / 4.0).min(height / 4.0);
		let layout_nodes: Vec<LayoutNode> = nodes
			.iter()
			.map(|node| {
				let (rx, ry) = seeded_unit_pair(&node.id);
				LayoutNode {
					id: node.id.clone(),
					name: node.name.clone(),
					kind: node.kind,
					x: margin + rx * (width - 2.0 * margin),
					y: margin + ry * (height - 2.0 * margin),
					vx: 0.0,
					vy: 0.0,
					pin: None,
				}
			})
			.collect();
		let index: HashMap<String, usize> = layout_nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();
		let links = edges
			.iter()
			.filter_map(|edge| {
				let source = *index.get(&edge.source)?;
				let target = *index.get(&edge.target)?;
				Some(LayoutLink {
					source,
					target,
					kind: edge.kind.clone(),
					key: edge.key(),
				})
			})
			.collect();

		Self {
			nodes: layout_nodes,
			index,
			links,
			width,
			height,
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
		}
	}

	pub fn nodes(&self) -> &[LayoutNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[LayoutLink] {
		&self.links
	}

	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn position(&self, id: &str) -> Option<(f64, f64)> {
		self.index.get(id).map(|&i| (self.nodes[i].x, self.nodes[i].y))
	}

	/// Hold a node at exactly (x, y) until unpinned.
	pub fn pin(&mut self, id: &str, x: f64, y: f64) {
		if let Some(&i) = self.index.get(id) {
			let node = &mut self.nodes[i];
			node.pin = Some((x, y));
			node.x = x;
			node.y = y;
			node.vx = 0.0;
			node.vy = 0.0;
		}
	}

	/// Release a pinned node back to the simulation.
	pub fn unpin(&mut self, id: &str) {
		if let Some(&i) = self.index.get(id) {
			self.nodes[i].pin = None;
		}
	}

	/// Raise the alpha target so neighbors keep reacting during a drag.
	pub fn reheat(&mut self) {
		self.alpha_target = DRAG_ALPHA_TARGET;
		self.running = true;
	}

	/// Let alpha decay back to rest after a drag ends.
	pub fn cool(&mut self) {
		self.alpha_target = 0.0;
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Advance one step. Returns false once the simulation has settled
	/// (alpha under [`ALPHA_MIN`] with a zero target); callers may keep
	/// invoking it, the positions just stop changing.
	pub fn tick(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;
		if self.alpha < ALPHA_MIN && self.alpha_target < ALPHA_MIN {
			self.running = false;
			return false;
		}

		self.apply_links();
		self.apply_charge();
		self.integrate();
		self.apply_collision();
		self.apply_center();
		true
	}

	/// Pull linked nodes toward the rest distance, split between both
	/// endpoints.
	fn apply_links(&mut self) {
		for link in &self.links {
			let (sx, sy) = (self.nodes[link.source].x, self.nodes[link.source].y);
			let (tx, ty) = (self.nodes[link.target].x, self.nodes[link.target].y);
			let (dx, dy) = (tx - sx, ty - sy);
			let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
			let pull = (distance - LINK_DISTANCE) / distance * LINK_STRENGTH * self.alpha;
			let (fx, fy) = (dx * pull * 0.5, dy * pull * 0.5);
			let source = &mut self.nodes[link.source];
			source.vx += fx;
			source.vy += fy;
			let target = &mut self.nodes[link.target];
			target.vx -= fx;
			target.vy -= fy;
		}
	}

	/// Pairwise repulsion with a distance cutoff. O(n²), fine for the
	/// target graph sizes.
	fn apply_charge(&mut self) {
		for i in 0..self.nodes.len() {
			for j in (i + 1)..self.nodes.len() {
				let (dx, dy) = (
					self.nodes[j].x - self.nodes[i].x,
					self.nodes[j].y - self.nodes[i].y,
				);
				let distance_sq = (dx * dx + dy * dy).max(MIN_DISTANCE * MIN_DISTANCE);
				if distance_sq > CHARGE_DISTANCE_MAX * CHARGE_DISTANCE_MAX {
					continue;
				}
				let force = CHARGE_STRENGTH * self.alpha / distance_sq;
				let (fx, fy) = (dx * force, dy * force);
				self.nodes[i].vx += fx;
				self.nodes[i].vy += fy;
				self.nodes[j].vx -= fx;
				self.nodes[j].vy -= fy;
			}
		}
	}

	/// Push overlapping nodes apart to their combined collision radii.
	/// Position-based, not alpha-scaled, so overlaps resolve even as the
	/// simulation cools.
	fn apply_collision(&mut self) {
		for i in 0..self.nodes.len() {
			for j in (i + 1)..self.nodes.len() {
				let min_distance =
					self.nodes[i].kind.collision_radius() + self.nodes[j].kind.collision_radius();
				let (dx, dy) = (
					self.nodes[j].x - self.nodes[i].x,
					self.nodes[j].y - self.nodes[i].y,
				);
				let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
				if distance >= min_distance {
					continue;
				}
				let overlap = (min_distance - distance) / distance * COLLISION_STRENGTH * 0.5;
				let (px, py) = (dx * overlap, dy * overlap);
				if !self.nodes[i].pinned() {
					self.nodes[i].x -= px;
					self.nodes[i].y -= py;
				}
				if !self.nodes[j].pinned() {
					self.nodes[j].x += px;
					self.nodes[j].y += py;
				}
			}
		}
	}

	/// Nudge the layout's mean position toward the canvas center.
	fn apply_center(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		let count = self.nodes.len() as f64;
		let mean_x = self.nodes.iter().map(|n| n.x).sum::<f64>() / count;
		let mean_y = self.nodes.iter().map(|n| n.y).sum::<f64>() / count;
		let shift_x = (self.width / 2.0 - mean_x) * CENTER_STRENGTH;
		let shift_y = (self.height / 2.0 - mean_y) * CENTER_STRENGTH;
		for node in &mut self.nodes {
			if !node.pinned() {
				node.x += shift_x;
				node.y += shift_y;
			}
		}
	}

	fn integrate(&mut self) {
		for node in &mut self.nodes {
			if let Some((px, py)) = node.pin {
				node.x = px;
				node.y = py;
				node.vx = 0.0;
				node.vy = 0.0;
			} else {
				node.vx *= VELOCITY_DECAY;
				node.vy *= VELOCITY_DECAY;
				node.x += node.vx;
				node.y += node.vy;
			}
		}
	}
}

/// Deterministic pseudo-random pair in [0, 1) derived from a node id.
/// FNV-1a over the id bytes, then two LCG steps.
fn seeded_unit_pair(id: &str) -> (f64, f64) {
	let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
	for byte in id.bytes() {
		hash ^= u64::from(byte);
		hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
	}
	let step = |state: u64| state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
	let a = step(hash);
	let b = step(a);
	let unit = |state: u64| (state >> 11) as f64 / (1u64 << 53) as f64;
	(unit(a), unit(b))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::twin_graph::types::NodeAttributes;

	fn node(id: &str, kind: NodeKind) -> Node {
		Node {
			id: id.into(),
			name: id.into(),
			kind,
			attributes: match kind {
				NodeKind::Agent => NodeAttributes::Agent,
				NodeKind::Context => NodeAttributes::Context {
					scheduled: None,
					participants: vec![],
					space: None,
				},
				NodeKind::Space => NodeAttributes::Space { capacity: None },
			},
			created_at: None,
		}
	}

	fn edge(source: &str, target: &str) -> Edge {
		Edge {
			id: None,
			source: source.into(),
			target: target.into(),
			kind: "participates_in".into(),
		}
	}

	fn sample() -> (Vec<Node>, Vec<Edge>) {
		let nodes = vec![
			node("agent-1", NodeKind::Agent),
			node("context-5", NodeKind::Context),
			node("space-9", NodeKind::Space),
		];
		let edges = vec![edge("agent-1", "context-5"), edge("space-9", "context-5")];
		(nodes, edges)
	}

	#[test]
	fn initial_scatter_is_seeded_and_in_bounds() {
		let (nodes, edges) = sample();
		let a = Simulation::new(&nodes, &edges, 800.0, 600.0);
		let b = Simulation::new(&nodes, &edges, 800.0, 600.0);
		for (na, nb) in a.nodes().iter().zip(b.nodes()) {
			assert_eq!((na.x, na.y), (nb.x, nb.y));
			assert!(na.x > 0.0 && na.x < 800.0);
			assert!(na.y > 0.0 && na.y < 600.0);
		}
		// Not collapsed onto a single point.
		assert_ne!(
			(a.nodes()[0].x, a.nodes()[0].y),
			(a.nodes()[1].x, a.nodes()[1].y)
		);
	}

	#[test]
	fn dangling_edges_are_dropped_at_construction() {
		let (nodes, mut edges) = sample();
		edges.push(edge("agent-7", "context-5"));
		let sim = Simulation::new(&nodes, &edges, 800.0, 600.0);
		assert_eq!(sim.links().len(), 2);
	}

	#[test]
	fn settles_within_a_bounded_tick_count() {
		let (nodes, edges) = sample();
		let mut sim = Simulation::new(&nodes, &edges, 800.0, 600.0);
		let mut ticks = 0;
		while sim.tick() {
			ticks += 1;
			assert!(ticks < 1000, "simulation failed to settle");
		}
		for node in sim.nodes() {
			assert!(node.x.is_finite() && node.y.is_finite());
		}
	}

	#[test]
	fn pinned_node_holds_position_exactly() {
		let (nodes, edges) = sample();
		let mut sim = Simulation::new(&nodes, &edges, 800.0, 600.0);
		sim.pin("context-5", 100.0, 200.0);
		sim.reheat();
		for _ in 0..10 {
			sim.tick();
		}
		assert_eq!(sim.position("context-5"), Some((100.0, 200.0)));
	}

	#[test]
	fn released_node_resumes_simulated_motion() {
		// Scenario D: drag context-5 to (100, 200), release, and the
		// connected link force moves it off that point.
		let (nodes, edges) = sample();
		let mut sim = Simulation::new(&nodes, &edges, 800.0, 600.0);
		sim.pin("context-5", 100.0, 200.0);
		sim.reheat();
		for _ in 0..5 {
			sim.tick();
		}
		sim.unpin("context-5");
		sim.cool();
		for _ in 0..20 {
			sim.tick();
		}
		let (x, y) = sim.position("context-5").unwrap();
		assert!((x - 100.0).abs() > 1e-6 || (y - 200.0).abs() > 1e-6);
	}

	#[test]
	fn reheat_restarts_a_settled_simulation() {
		let (nodes, edges) = sample();
		let mut sim = Simulation::new(&nodes, &edges, 800.0, 600.0);
		while sim.tick() {}
		assert!(!sim.is_running());
		sim.reheat();
		assert!(sim.tick());
	}
}
