//! The hospital digital-twin graph engine: entity normalization, edge
//! synthesis, reachability/search filtering, force layout, and the
//! interactive canvas component.

mod component;
mod filter;
mod normalize;
mod render;
mod simulation;
mod state;
mod synthesize;
mod types;

pub use component::TwinGraphCanvas;
pub use filter::{FocusMode, ViewState, view_subgraph};
pub use normalize::normalize_nodes;
pub use synthesize::synthesize_edges;
pub use types::{
	AgentRecord, ContextRecord, Edge, Node, NodeKind, RelationshipRecord, Snapshot, SpaceRecord,
	node_id,
};
