//! Interaction state for the graph canvas: viewport transform, drag and
//! pan tracking, and click-driven selection highlighting.

use std::collections::HashSet;

use super::simulation::Simulation;
use super::types::{Edge, EdgeKey, Node};

/// Extra slack around a node's disc for pointer hit testing.
const HIT_SLACK: f64 = 4.0;

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<String>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Click-driven selection: the selected node, its direct neighbors, and
/// the edges connecting them. View-state only — it never changes the
/// underlying filtered node/edge set.
#[derive(Clone, Debug, Default)]
pub struct Selection {
	pub node: Option<String>,
	pub neighbors: HashSet<String>,
	pub edges: HashSet<EdgeKey>,
}

impl Selection {
	pub fn is_active(&self) -> bool {
		self.node.is_some()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.node.as_deref() == Some(id) || self.neighbors.contains(id)
	}
}

/// All mutable state behind one graph canvas. Owns the simulation for the
/// currently displayed subgraph; rebuilding this state replaces (and so
/// stops) the previous simulation, keeping a single writer per canvas.
pub struct TwinGraphState {
	pub sim: Simulation,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub selection: Selection,
	pub width: f64,
	pub height: f64,
}

impl TwinGraphState {
	pub fn new(nodes: &[Node], edges: &[Edge], width: f64, height: f64) -> Self {
		Self {
			sim: Simulation::new(nodes, edges, width, height),
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			selection: Selection::default(),
			width,
			height,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen-space point, if any.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		for node in self.sim.nodes() {
			let (dx, dy) = (node.x - gx, node.y - gy);
			if (dx * dx + dy * dy).sqrt() < node.kind.radius() + HIT_SLACK {
				found = Some(node.id.clone());
			}
		}
		found
	}

	/// Begin dragging a node: pin it where it stands and warm the
	/// simulation so its neighbors follow smoothly.
	pub fn start_drag(&mut self, id: &str, sx: f64, sy: f64) {
		let Some((x, y)) = self.sim.position(id) else {
			return;
		};
		self.drag = DragState {
			active: true,
			node: Some(id.to_string()),
			start_x: sx,
			start_y: sy,
			node_start_x: x,
			node_start_y: y,
		};
		self.sim.pin(id, x, y);
		self.sim.reheat();
	}

	/// Track the pointer: move the pinned node in graph coordinates.
	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		if !self.drag.active {
			return;
		}
		let Some(id) = self.drag.node.clone() else {
			return;
		};
		let (dx, dy) = (
			(sx - self.drag.start_x) / self.transform.k,
			(sy - self.drag.start_y) / self.transform.k,
		);
		self.sim
			.pin(&id, self.drag.node_start_x + dx, self.drag.node_start_y + dy);
	}

	/// Release the dragged node back to the simulation.
	pub fn end_drag(&mut self) {
		if let Some(id) = self.drag.node.take() {
			self.sim.unpin(&id);
			self.sim.cool();
		}
		self.drag.active = false;
	}

	/// Select a node and compute its highlight set: the node itself, its
	/// direct neighbors, and the edges between them.
	pub fn select(&mut self, id: &str) {
		if self.sim.node_index(id).is_none() {
			return;
		}
		let mut selection = Selection {
			node: Some(id.to_string()),
			neighbors: HashSet::new(),
			edges: HashSet::new(),
		};
		let nodes = self.sim.nodes();
		for link in self.sim.links() {
			let (source, target) = (&nodes[link.source], &nodes[link.target]);
			let neighbor = if source.id == id {
				&target.id
			} else if target.id == id {
				&source.id
			} else {
				continue;
			};
			selection.neighbors.insert(neighbor.clone());
			selection.edges.insert(link.key.clone());
		}
		self.selection = selection;
	}

	pub fn clear_selection(&mut self) {
		self.selection = Selection::default();
	}

	/// The currently selected node id along with its neighbor names, for
	/// the detail panel.
	pub fn selected_id(&self) -> Option<&str> {
		self.selection.node.as_deref()
	}

	pub fn start_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}
	}

	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	/// Scale about a screen-space point, clamped to a sane range. Pure
	/// viewport math, never touches node physics.
	pub fn zoom(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 4.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self) {
		self.sim.tick();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::twin_graph::types::{NodeAttributes, NodeKind};

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

	fn edge(source: &str, target: &str, kind: &str) -> Edge {
		Edge {
			id: None,
			source: source.into(),
			target: target.into(),
			kind: kind.into(),
		}
	}

	fn state() -> TwinGraphState {
		let nodes = vec![
			node("agent-1", NodeKind::Agent),
			node("agent-2", NodeKind::Agent),
			node("context-5", NodeKind::Context),
			node("space-9", NodeKind::Space),
		];
		let edges = vec![
			edge("agent-1", "context-5", "participates_in"),
			edge("space-9", "context-5", "assigned_space"),
		];
		TwinGraphState::new(&nodes, &edges, 800.0, 600.0)
	}

	#[test]
	fn select_highlights_node_neighbors_and_edges() {
		let mut s = state();
		s.select("context-5");
		assert_eq!(s.selected_id(), Some("context-5"));
		assert!(s.selection.contains("agent-1"));
		assert!(s.selection.contains("space-9"));
		assert!(!s.selection.contains("agent-2"));
		assert_eq!(s.selection.edges.len(), 2);
	}

	#[test]
	fn selecting_a_missing_node_is_a_no_op() {
		let mut s = state();
		s.select("agent-404");
		assert!(!s.selection.is_active());
	}

	#[test]
	fn drag_pins_then_release_frees_the_node() {
		let mut s = state();
		s.start_drag("context-5", 10.0, 10.0);
		s.drag_to(110.0, 210.0);
		let (x, y) = s.sim.position("context-5").unwrap();
		assert!((x - s.drag.node_start_x - 100.0).abs() < 1e-9);
		assert!((y - s.drag.node_start_y - 200.0).abs() < 1e-9);
		s.end_drag();
		assert!(!s.drag.active);
		assert!(!s.sim.nodes().iter().any(|n| n.pinned()));
	}

	#[test]
	fn drag_accounts_for_zoom_scale() {
		let mut s = state();
		s.transform.k = 2.0;
		s.start_drag("agent-1", 0.0, 0.0);
		s.drag_to(100.0, 0.0);
		let (x, _) = s.sim.position("agent-1").unwrap();
		// 100 screen pixels at 2x zoom is 50 graph units.
		assert!((x - s.drag.node_start_x - 50.0).abs() < 1e-9);
	}

	#[test]
	fn zoom_is_clamped_and_anchored() {
		let mut s = state();
		for _ in 0..100 {
			s.zoom(400.0, 300.0, -1.0);
		}
		assert!(s.transform.k <= 4.0);
		for _ in 0..200 {
			s.zoom(400.0, 300.0, 1.0);
		}
		assert!(s.transform.k >= 0.1);
	}

	#[test]
	fn hit_test_respects_the_view_transform() {
		let mut s = state();
		// Park every node at a known, well-separated spot.
		s.sim.pin("agent-1", 100.0, 100.0);
		s.sim.pin("agent-2", 700.0, 100.0);
		s.sim.pin("context-5", 100.0, 500.0);
		s.sim.pin("space-9", 700.0, 500.0);
		s.transform = ViewTransform {
			x: 30.0,
			y: -20.0,
			k: 1.0,
		};
		let hit = s.node_at_position(100.0 + 30.0, 100.0 - 20.0);
		assert_eq!(hit.as_deref(), Some("agent-1"));
		assert!(s.node_at_position(400.0 + 30.0, 300.0 - 20.0).is_none());
	}
}
