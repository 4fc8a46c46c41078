//! Graph data model and raw backend record shapes.

/// Entity kind of a graph node. Fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Agent,
	Context,
	Space,
}

impl NodeKind {
	pub fn label(&self) -> &'static str {
		match self {
			NodeKind::Agent => "agent",
			NodeKind::Context => "context",
			NodeKind::Space => "space",
		}
	}

	pub fn color(&self) -> &'static str {
		match self {
			NodeKind::Agent => "#3b82f6",
			NodeKind::Context => "#10b981",
			NodeKind::Space => "#8b5cf6",
		}
	}

	/// Disc radius on the canvas. Context nodes render larger.
	pub fn radius(&self) -> f64 {
		match self {
			NodeKind::Context => 20.0,
			_ => 16.0,
		}
	}

	/// Minimum separation radius for the collision force.
	pub fn collision_radius(&self) -> f64 {
		match self {
			NodeKind::Context => 35.0,
			_ => 30.0,
		}
	}
}

/// Kind-specific display attributes. Not interpreted by the graph engine.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeAttributes {
	Agent,
	Context {
		scheduled: Option<String>,
		participants: Vec<String>,
		space: Option<String>,
	},
	Space {
		capacity: Option<u32>,
	},
}

impl NodeAttributes {
	/// Ordered key/value rows for the detail panel.
	pub fn pairs(&self) -> Vec<(&'static str, String)> {
		match self {
			NodeAttributes::Agent => Vec::new(),
			NodeAttributes::Context {
				scheduled,
				participants,
				space,
			} => {
				let mut rows = Vec::new();
				if let Some(time) = scheduled {
					rows.push(("time", time.clone()));
				}
				rows.push(("participants", participants.join(", ")));
				rows.push((
					"space",
					space.clone().unwrap_or_else(|| "no space".into()),
				));
				rows
			}
			NodeAttributes::Space { capacity } => capacity
				.map(|c| vec![("capacity", c.to_string())])
				.unwrap_or_default(),
		}
	}
}

/// A graph vertex: one agent, context, or space.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub name: String,
	pub kind: NodeKind,
	pub attributes: NodeAttributes,
	pub created_at: Option<String>,
}

/// Namespaced node id, stable across refreshes for the same backend row.
pub fn node_id(kind: NodeKind, backend_id: u32) -> String {
	format!("{}-{}", kind.label(), backend_id)
}

/// A graph connection. Direction is semantic; layout treats it undirected.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	/// Present only for explicit relationship records; synthesized edges
	/// are identified by their key triple.
	pub id: Option<String>,
	pub source: String,
	pub target: String,
	pub kind: String,
}

/// Identity triple used for dedup and highlight bookkeeping.
pub type EdgeKey = (String, String, String);

impl Edge {
	pub fn key(&self) -> EdgeKey {
		(self.source.clone(), self.target.clone(), self.kind.clone())
	}

	pub fn touches(&self, id: &str) -> bool {
		self.source == id || self.target == id
	}
}

/// Raw agent row as delivered by the backend.
#[derive(Clone, Debug, Default)]
pub struct AgentRecord {
	pub id: u32,
	pub name: String,
	pub created_at: Option<String>,
}

/// Raw context row. `agents` and `space` are foreign keys; `agent_names`
/// and `space_name` are the denormalized detail fields that ride along.
#[derive(Clone, Debug, Default)]
pub struct ContextRecord {
	pub id: u32,
	pub name: String,
	pub scheduled: Option<String>,
	pub space: Option<u32>,
	pub agents: Vec<u32>,
	pub agent_names: Vec<String>,
	pub space_name: Option<String>,
	pub created_at: Option<String>,
}

/// Raw space row.
#[derive(Clone, Debug, Default)]
pub struct SpaceRecord {
	pub id: u32,
	pub name: String,
	pub capacity: Option<u32>,
	pub created_at: Option<String>,
}

/// Explicit agent-to-agent relationship row.
#[derive(Clone, Debug, Default)]
pub struct RelationshipRecord {
	pub id: u32,
	pub agent_from: u32,
	pub agent_to: u32,
	pub description: String,
	pub created_at: Option<String>,
}

/// One full fetch cycle of backend data. A new snapshot always replaces
/// the previous one wholesale; nothing is merged incrementally.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
	pub agents: Vec<AgentRecord>,
	pub contexts: Vec<ContextRecord>,
	pub spaces: Vec<SpaceRecord>,
	pub relationships: Vec<RelationshipRecord>,
}
