//! Entity normalizer: raw backend collections into uniform graph nodes.

use std::collections::HashSet;

use log::debug;

use super::types::{Node, NodeAttributes, NodeKind, Snapshot, node_id};

/// Map a snapshot's agent/context/space rows to nodes.
///
/// Pure and deterministic: agents first, then contexts, then spaces, each
/// in input order. Ids are namespaced by kind so numeric primary keys
/// cannot collide across entity tables, and re-normalizing the same row
/// always yields the same id. Duplicate ids (the same row appearing twice
/// in one response) are dropped, first occurrence wins.
pub fn normalize_nodes(snapshot: &Snapshot) -> Vec<Node> {
	let mut nodes = Vec::with_capacity(
		snapshot.agents.len() + snapshot.contexts.len() + snapshot.spaces.len(),
	);
	let mut seen: HashSet<String> = HashSet::new();

	let mut push = |node: Node, nodes: &mut Vec<Node>| {
		if seen.insert(node.id.clone()) {
			nodes.push(node);
		} else {
			debug!("normalize: duplicate node id {}, keeping first", node.id);
		}
	};

	for agent in &snapshot.agents {
		push(
			Node {
				id: node_id(NodeKind::Agent, agent.id),
				name: agent.name.clone(),
				kind: NodeKind::Agent,
				attributes: NodeAttributes::Agent,
				created_at: agent.created_at.clone(),
			},
			&mut nodes,
		);
	}

	for context in &snapshot.contexts {
		push(
			Node {
				id: node_id(NodeKind::Context, context.id),
				name: context.name.clone(),
				kind: NodeKind::Context,
				attributes: NodeAttributes::Context {
					scheduled: context.scheduled.clone(),
					participants: context.agent_names.clone(),
					space: context.space_name.clone(),
				},
				created_at: context.created_at.clone(),
			},
			&mut nodes,
		);
	}

	for space in &snapshot.spaces {
		push(
			Node {
				id: node_id(NodeKind::Space, space.id),
				name: space.name.clone(),
				kind: NodeKind::Space,
				attributes: NodeAttributes::Space {
					capacity: space.capacity,
				},
				created_at: space.created_at.clone(),
			},
			&mut nodes,
		);
	}

	nodes
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::twin_graph::types::{AgentRecord, ContextRecord, SpaceRecord};

	fn snapshot() -> Snapshot {
		Snapshot {
			agents: vec![
				AgentRecord {
					id: 1,
					name: "Dr. Smith".into(),
					created_at: Some("2024-01-01T00:00:00Z".into()),
				},
				AgentRecord {
					id: 2,
					name: "Nurse Johnson".into(),
					created_at: None,
				},
			],
			contexts: vec![ContextRecord {
				id: 5,
				name: "Heart Surgery".into(),
				scheduled: Some("2024-02-01T09:00:00Z".into()),
				space: None,
				agents: vec![1],
				agent_names: vec!["Dr. Smith".into()],
				space_name: None,
				created_at: None,
			}],
			spaces: vec![SpaceRecord {
				id: 9,
				name: "Operating Room 1".into(),
				capacity: Some(6),
				created_at: None,
			}],
			relationships: vec![],
		}
	}

	#[test]
	fn ids_are_namespaced_by_kind() {
		let nodes = normalize_nodes(&snapshot());
		let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["agent-1", "agent-2", "context-5", "space-9"]);
	}

	#[test]
	fn repeated_normalization_is_identical() {
		let snap = snapshot();
		assert_eq!(normalize_nodes(&snap), normalize_nodes(&snap));
	}

	#[test]
	fn missing_optional_fields_become_absent_attributes() {
		let nodes = normalize_nodes(&snapshot());
		let context = nodes.iter().find(|n| n.id == "context-5").unwrap();
		match &context.attributes {
			NodeAttributes::Context { space, .. } => assert!(space.is_none()),
			other => panic!("unexpected attributes: {other:?}"),
		}
	}

	#[test]
	fn duplicate_backend_rows_emit_one_node() {
		let mut snap = snapshot();
		snap.agents.push(AgentRecord {
			id: 1,
			name: "Dr. Smith (dup)".into(),
			created_at: None,
		});
		let nodes = normalize_nodes(&snap);
		let smiths: Vec<_> = nodes.iter().filter(|n| n.id == "agent-1").collect();
		assert_eq!(smiths.len(), 1);
		assert_eq!(smiths[0].name, "Dr. Smith");
	}
}
