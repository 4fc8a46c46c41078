//! Relationship synthesizer: derives the edge set from context foreign
//! keys and explicit agent-to-agent relationship records.

use std::collections::HashSet;

use log::warn;

use super::types::{Edge, Node, NodeKind, Snapshot, node_id};

/// Default label for explicit relationships with a blank description.
pub const DEFAULT_RELATIONSHIP_KIND: &str = "related";

/// Build the full edge list for one snapshot.
///
/// Emission order is fixed: for each context in input order, one
/// `participates_in` edge per listed agent, then an `assigned_space` edge
/// if a space is assigned; explicit relationship records follow in input
/// order. Edges whose endpoints are missing from the node set, and
/// self-relationships, are dropped — upstream data may be mid-delete and
/// must not break the view.
///
/// The edge set is recomputed from scratch on every snapshot; it is never
/// patched incrementally.
pub fn synthesize_edges(nodes: &[Node], snapshot: &Snapshot) -> Vec<Edge> {
	let known: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
	let mut edges = Vec::new();

	for context in &snapshot.contexts {
		let context_id = node_id(NodeKind::Context, context.id);
		if !known.contains(context_id.as_str()) {
			continue;
		}

		for &agent in &context.agents {
			let agent_id = node_id(NodeKind::Agent, agent);
			if !known.contains(agent_id.as_str()) {
				warn!(
					"synthesize: context {} lists unknown agent {}, skipping",
					context_id, agent_id
				);
				continue;
			}
			edges.push(Edge {
				id: None,
				source: agent_id,
				target: context_id.clone(),
				kind: "participates_in".into(),
			});
		}

		if let Some(space) = context.space {
			let space_id = node_id(NodeKind::Space, space);
			if known.contains(space_id.as_str()) {
				edges.push(Edge {
					id: None,
					source: space_id,
					target: context_id.clone(),
					kind: "assigned_space".into(),
				});
			} else {
				warn!(
					"synthesize: context {} references unknown space {}, skipping",
					context_id, space_id
				);
			}
		}
	}

	for rel in &snapshot.relationships {
		if rel.agent_from == rel.agent_to {
			warn!("synthesize: dropping self-relationship {}", rel.id);
			continue;
		}
		let from = node_id(NodeKind::Agent, rel.agent_from);
		let to = node_id(NodeKind::Agent, rel.agent_to);
		if !known.contains(from.as_str()) || !known.contains(to.as_str()) {
			warn!("synthesize: relationship {} has missing endpoint, skipping", rel.id);
			continue;
		}
		let kind = if rel.description.trim().is_empty() {
			DEFAULT_RELATIONSHIP_KIND.into()
		} else {
			rel.description.clone()
		};
		edges.push(Edge {
			id: Some(format!("relationship-{}", rel.id)),
			source: from,
			target: to,
			kind,
		});
	}

	edges
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::twin_graph::normalize::normalize_nodes;
	use crate::components::twin_graph::types::{
		AgentRecord, ContextRecord, RelationshipRecord, SpaceRecord,
	};

	fn snapshot() -> Snapshot {
		Snapshot {
			agents: vec![
				AgentRecord {
					id: 1,
					name: "Dr. Smith".into(),
					..Default::default()
				},
				AgentRecord {
					id: 2,
					name: "Nurse Johnson".into(),
					..Default::default()
				},
			],
			contexts: vec![ContextRecord {
				id: 5,
				name: "Heart Surgery".into(),
				space: Some(9),
				agents: vec![1, 2],
				..Default::default()
			}],
			spaces: vec![SpaceRecord {
				id: 9,
				name: "Operating Room 1".into(),
				..Default::default()
			}],
			relationships: vec![RelationshipRecord {
				id: 3,
				agent_from: 1,
				agent_to: 2,
				description: "supervises".into(),
				..Default::default()
			}],
		}
	}

	#[test]
	fn emits_participation_space_and_explicit_edges_in_order() {
		let snap = snapshot();
		let nodes = normalize_nodes(&snap);
		let edges = synthesize_edges(&nodes, &snap);
		let keys: Vec<(&str, &str, &str)> = edges
			.iter()
			.map(|e| (e.source.as_str(), e.target.as_str(), e.kind.as_str()))
			.collect();
		assert_eq!(
			keys,
			[
				("agent-1", "context-5", "participates_in"),
				("agent-2", "context-5", "participates_in"),
				("space-9", "context-5", "assigned_space"),
				("agent-1", "agent-2", "supervises"),
			]
		);
	}

	#[test]
	fn deterministic_across_invocations() {
		let snap = snapshot();
		let nodes = normalize_nodes(&snap);
		assert_eq!(synthesize_edges(&nodes, &snap), synthesize_edges(&nodes, &snap));
	}

	#[test]
	fn skips_references_to_absent_nodes() {
		let mut snap = snapshot();
		snap.contexts[0].agents.push(7); // agent-7 does not exist
		snap.contexts[0].space = Some(99); // neither does space-99
		let nodes = normalize_nodes(&snap);
		let edges = synthesize_edges(&nodes, &snap);
		assert!(edges.iter().all(|e| e.source != "agent-7"));
		assert!(edges.iter().all(|e| e.source != "space-99"));
	}

	#[test]
	fn drops_self_relationships() {
		let mut snap = snapshot();
		snap.relationships.push(RelationshipRecord {
			id: 4,
			agent_from: 1,
			agent_to: 1,
			description: "self".into(),
			..Default::default()
		});
		let nodes = normalize_nodes(&snap);
		let edges = synthesize_edges(&nodes, &snap);
		assert!(edges.iter().all(|e| e.source != e.target));
	}

	#[test]
	fn blank_description_gets_default_label() {
		let mut snap = snapshot();
		snap.relationships[0].description = "  ".into();
		let nodes = normalize_nodes(&snap);
		let edges = synthesize_edges(&nodes, &snap);
		assert_eq!(edges.last().unwrap().kind, DEFAULT_RELATIONSHIP_KIND);
	}
}
