//! Reachability and search/type filtering over the synthesized graph.

use std::collections::{HashSet, VecDeque};

use super::types::{Edge, Node, NodeKind};

/// How the displayed subgraph relates to an optional focus node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FocusMode {
	/// No reachability filtering; the full graph passes through.
	#[default]
	None,
	/// The focus node and everything one edge away, with only the edges
	/// touching the focus node.
	DirectNeighbors,
	/// The entire connected component containing the focus node, edges
	/// walked in both directions to a fixed point.
	FullComponent,
}

/// View-state driving the displayed subgraph: search term, kind facet,
/// and reachability focus. Owned by the page, not by the pipeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
	pub search_term: String,
	pub kind_facet: Option<NodeKind>,
	pub focus: Option<String>,
	pub mode: FocusMode,
}

impl ViewState {
	/// Back to the unfiltered view: no search, no facet, no focus.
	pub fn reset(&mut self) {
		*self = ViewState::default();
	}
}

/// Compute the reachability subset around `focus`.
///
/// With mode `None` the input passes through untouched (focus ignored).
/// A focus id absent from the node set yields an empty subgraph — a
/// distinct, observable outcome from "no focus", so a stale reference
/// shows an empty view rather than silently falling back to everything.
pub fn reachable(
	nodes: &[Node],
	edges: &[Edge],
	focus: Option<&str>,
	mode: FocusMode,
) -> (Vec<Node>, Vec<Edge>) {
	let focus = match (mode, focus) {
		(FocusMode::None, _) | (_, None) => {
			return (nodes.to_vec(), edges.to_vec());
		}
		(_, Some(id)) => id,
	};
	let known: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
	if !known.contains(focus) {
		return (Vec::new(), Vec::new());
	}

	match mode {
		FocusMode::None => unreachable!("handled above"),
		FocusMode::DirectNeighbors => {
			// Dangling edges (an endpoint already deleted upstream) are
			// dropped here so the output never references a missing node.
			let touching: Vec<Edge> = edges
				.iter()
				.filter(|e| {
					e.touches(focus)
						&& known.contains(e.source.as_str())
						&& known.contains(e.target.as_str())
				})
				.cloned()
				.collect();
			let mut keep: HashSet<&str> = HashSet::new();
			keep.insert(focus);
			for edge in &touching {
				keep.insert(edge.source.as_str());
				keep.insert(edge.target.as_str());
			}
			let subset = nodes
				.iter()
				.filter(|n| keep.contains(n.id.as_str()))
				.cloned()
				.collect();
			(subset, touching)
		}
		FocusMode::FullComponent => {
			// Breadth-first fixed point over the undirected edge relation.
			// A single hop is not enough: agents sharing a context with the
			// focus node are only reachable through that context node.
			let mut component: HashSet<&str> = HashSet::new();
			let mut queue: VecDeque<&str> = VecDeque::new();
			component.insert(focus);
			queue.push_back(focus);
			while let Some(current) = queue.pop_front() {
				for edge in edges {
					// Dangling edges do not exist for traversal purposes.
					if !known.contains(edge.source.as_str()) || !known.contains(edge.target.as_str())
					{
						continue;
					}
					let neighbor = if edge.source == current {
						edge.target.as_str()
					} else if edge.target == current {
						edge.source.as_str()
					} else {
						continue;
					};
					if component.insert(neighbor) {
						queue.push_back(neighbor);
					}
				}
			}
			let subset: Vec<Node> = nodes
				.iter()
				.filter(|n| component.contains(n.id.as_str()))
				.cloned()
				.collect();
			let subset_edges = edges
				.iter()
				.filter(|e| {
					component.contains(e.source.as_str())
						&& component.contains(e.target.as_str())
						&& known.contains(e.source.as_str())
						&& known.contains(e.target.as_str())
				})
				.cloned()
				.collect();
			(subset, subset_edges)
		}
	}
}

/// Narrow by case-insensitive substring search on node name (the kind
/// label doubles as a secondary match target) and by kind facet. Edges
/// are restricted to endpoints surviving the node filter.
pub fn search(
	nodes: &[Node],
	edges: &[Edge],
	term: &str,
	facet: Option<NodeKind>,
) -> (Vec<Node>, Vec<Edge>) {
	let needle = term.trim().to_lowercase();
	let subset: Vec<Node> = nodes
		.iter()
		.filter(|n| facet.is_none_or(|k| n.kind == k))
		.filter(|n| {
			needle.is_empty()
				|| n.name.to_lowercase().contains(&needle)
				|| n.kind.label().contains(&needle)
		})
		.cloned()
		.collect();
	let kept: HashSet<&str> = subset.iter().map(|n| n.id.as_str()).collect();
	let subset_edges = edges
		.iter()
		.filter(|e| kept.contains(e.source.as_str()) && kept.contains(e.target.as_str()))
		.cloned()
		.collect();
	(subset, subset_edges)
}

/// The displayed subgraph for one view-state: reachability and search are
/// applied as orthogonal filters and intersected by node id; the final
/// pass drops any edge with an endpoint outside the surviving node set,
/// so the output always satisfies the endpoint invariant even when the
/// input carried dangling edges.
pub fn view_subgraph(nodes: &[Node], edges: &[Edge], view: &ViewState) -> (Vec<Node>, Vec<Edge>) {
	let (reach_nodes, _) = reachable(nodes, edges, view.focus.as_deref(), view.mode);
	let (search_nodes, _) = search(nodes, edges, &view.search_term, view.kind_facet);

	let reach_ids: HashSet<&str> = reach_nodes.iter().map(|n| n.id.as_str()).collect();
	let subset: Vec<Node> = search_nodes
		.into_iter()
		.filter(|n| reach_ids.contains(n.id.as_str()))
		.collect();
	let kept: HashSet<&str> = subset.iter().map(|n| n.id.as_str()).collect();

	let mut subset_edges: Vec<Edge> = Vec::new();
	let mut seen = HashSet::new();
	let in_focus_star = |e: &Edge| match (view.mode, view.focus.as_deref()) {
		(FocusMode::DirectNeighbors, Some(focus)) => e.touches(focus),
		_ => true,
	};
	for edge in edges {
		if kept.contains(edge.source.as_str())
			&& kept.contains(edge.target.as_str())
			&& in_focus_star(edge)
			&& seen.insert(edge.key())
		{
			subset_edges.push(edge.clone());
		}
	}
	(subset, subset_edges)
}
