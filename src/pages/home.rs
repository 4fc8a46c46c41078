//! Dashboard page: stat cards, graph controls, and the system graph.

use leptos::prelude::*;

use crate::components::twin_graph::{
	AgentRecord, ContextRecord, Edge, FocusMode, Node, NodeKind, RelationshipRecord, Snapshot,
	SpaceRecord, TwinGraphCanvas, ViewState, node_id, normalize_nodes, synthesize_edges,
	view_subgraph,
};

/// Demo snapshot standing in for the out-of-scope data-fetching layer.
fn demo_snapshot() -> Snapshot {
	let agent = |id: u32, name: &str| AgentRecord {
		id,
		name: name.into(),
		created_at: Some("2024-01-01T00:00:00Z".into()),
	};
	let space = |id: u32, name: &str, capacity: u32| SpaceRecord {
		id,
		name: name.into(),
		capacity: Some(capacity),
		created_at: Some("2024-01-01T00:00:00Z".into()),
	};

	Snapshot {
		agents: vec![
			agent(1, "Dr. Smith"),
			agent(2, "Nurse Johnson"),
			agent(3, "Patient Doe"),
			agent(4, "MRI Scanner A1"),
			agent(5, "Dr. Garcia"),
		],
		spaces: vec![
			space(1, "Operating Room 1", 8),
			space(2, "Patient Room 101", 2),
			space(3, "Emergency Ward", 20),
		],
		contexts: vec![
			ContextRecord {
				id: 1,
				name: "Heart Surgery Procedure".into(),
				scheduled: Some("2024-02-01T09:00:00Z".into()),
				space: Some(1),
				agents: vec![1, 2, 3],
				agent_names: vec![
					"Dr. Smith".into(),
					"Nurse Johnson".into(),
					"Patient Doe".into(),
				],
				space_name: Some("Operating Room 1".into()),
				created_at: Some("2024-01-15T00:00:00Z".into()),
			},
			ContextRecord {
				id: 2,
				name: "MRI Scan Session".into(),
				scheduled: Some("2024-02-02T14:00:00Z".into()),
				space: Some(3),
				agents: vec![3, 4],
				agent_names: vec!["Patient Doe".into(), "MRI Scanner A1".into()],
				space_name: Some("Emergency Ward".into()),
				created_at: Some("2024-01-16T00:00:00Z".into()),
			},
			ContextRecord {
				id: 3,
				name: "Morning Rounds".into(),
				scheduled: Some("2024-02-03T07:30:00Z".into()),
				space: Some(2),
				agents: vec![2, 5],
				agent_names: vec!["Nurse Johnson".into(), "Dr. Garcia".into()],
				space_name: Some("Patient Room 101".into()),
				created_at: Some("2024-01-17T00:00:00Z".into()),
			},
		],
		relationships: vec![
			RelationshipRecord {
				id: 1,
				agent_from: 1,
				agent_to: 2,
				description: "supervises".into(),
				created_at: Some("2024-01-10T00:00:00Z".into()),
			},
			RelationshipRecord {
				id: 2,
				agent_from: 5,
				agent_to: 3,
				description: "attending physician".into(),
				created_at: Some("2024-01-12T00:00:00Z".into()),
			},
		],
	}
}

fn parse_facet(value: &str) -> Option<NodeKind> {
	match value {
		"agent" => Some(NodeKind::Agent),
		"context" => Some(NodeKind::Context),
		"space" => Some(NodeKind::Space),
		_ => None,
	}
}

/// The system graph dashboard.
#[component]
pub fn Home() -> impl IntoView {
	let snapshot = demo_snapshot();
	let stats = (
		snapshot.agents.len() + snapshot.contexts.len() + snapshot.spaces.len(),
		snapshot.agents.len(),
		snapshot.contexts.len(),
		snapshot.spaces.len(),
		snapshot.relationships.len(),
	);
	let viewer_agents: Vec<(u32, String)> = snapshot
		.agents
		.iter()
		.map(|a| (a.id, a.name.clone()))
		.collect();

	let all_nodes = normalize_nodes(&snapshot);
	let all_edges = synthesize_edges(&all_nodes, &snapshot);
	let focus_options: Vec<(String, String)> = all_nodes
		.iter()
		.map(|n| (n.id.clone(), format!("{} ({})", n.name, n.kind.label())))
		.collect();
	let graph_data = StoredValue::new((all_nodes, all_edges));

	let search = RwSignal::new(String::new());
	let facet = RwSignal::new(String::from("all"));
	let focus = RwSignal::new(Option::<String>::None);
	let viewer = RwSignal::new(Option::<u32>::None);
	let selected = RwSignal::new(Option::<String>::None);

	// The personalized default for a non-admin viewer is the full
	// connected component around their own agent node; an explicit focus
	// takes precedence.
	let view = Memo::new(move |_| {
		let focus_id = focus
			.get()
			.or_else(|| viewer.get().map(|id| node_id(NodeKind::Agent, id)));
		ViewState {
			search_term: search.get(),
			kind_facet: parse_facet(&facet.get()),
			mode: if focus_id.is_some() {
				FocusMode::FullComponent
			} else {
				FocusMode::None
			},
			focus: focus_id,
		}
	});

	let subgraph = Memo::new(move |_| {
		graph_data.with_value(|(nodes, edges)| view_subgraph(nodes, edges, &view.get()))
	});
	let graph_nodes = Signal::derive(move || subgraph.get().0);
	let graph_edges = Signal::derive(move || subgraph.get().1);

	let on_focus = Callback::new(move |id: String| {
		focus.set(Some(id));
	});
	let reset = move |_| {
		search.set(String::new());
		facet.set("all".into());
		focus.set(None);
		selected.set(None);
	};

	let selected_node = Memo::new(move |_| {
		let id = selected.get()?;
		subgraph.get().0.into_iter().find(|n| n.id == id)
	});

	view! {
		<div class="dashboard">
			<h2>"System Graph"</h2>
			<p class="subtitle">
				"Visual representation of all objects and their relationships. Click to select, double-click to focus, drag to reposition, scroll to zoom."
			</p>

			<div class="stat-cards">
				<StatCard label="Total Objects" value=stats.0 />
				<StatCard label="Agents" value=stats.1 />
				<StatCard label="Contexts" value=stats.2 />
				<StatCard label="Spaces" value=stats.3 />
				<StatCard label="Relationships" value=stats.4 />
			</div>

			<div class="graph-controls">
				<input
					type="text"
					placeholder="Search objects..."
					prop:value=search
					on:input=move |ev| search.set(event_target_value(&ev))
				/>
				<select
					prop:value=facet
					on:change=move |ev| facet.set(event_target_value(&ev))
				>
					<option value="all">"All Types"</option>
					<option value="agent">"Agents"</option>
					<option value="context">"Contexts"</option>
					<option value="space">"Spaces"</option>
				</select>
				<select on:change=move |ev| {
					let value = event_target_value(&ev);
					focus.set((!value.is_empty()).then_some(value));
				}>
					<option value="">"Focus on object..."</option>
					{focus_options
						.iter()
						.map(|(id, label)| {
							view! { <option value=id.clone()>{label.clone()}</option> }
						})
						.collect_view()}
				</select>
				<select on:change=move |ev| {
					let value = event_target_value(&ev);
					viewer.set(value.parse::<u32>().ok());
					focus.set(None);
				}>
					<option value="">"Admin (full graph)"</option>
					{viewer_agents
						.iter()
						.map(|(id, name)| {
							view! {
								<option value=id.to_string()>{format!("View as {name}")}</option>
							}
						})
						.collect_view()}
				</select>
				<button on:click=reset>"Reset"</button>
			</div>

			<div class="legend">
				<span style="color: #3b82f6;">"● Agents"</span>
				<span style="color: #10b981;">"● Contexts"</span>
				<span style="color: #8b5cf6;">"● Spaces"</span>
			</div>

			<div class="graph-row">
				<Show
					when=move || !subgraph.get().0.is_empty()
					fallback=|| {
						view! {
							<p class="empty-state">
								"No objects match the current view. The focused entity may have been removed."
							</p>
						}
					}
				>
					<TwinGraphCanvas
						nodes=graph_nodes
						edges=graph_edges
						selected=selected
						on_focus=on_focus
					/>
				</Show>
				{move || {
					selected_node
						.get()
						.map(|node| {
							view! { <DetailPanel node=node nodes=graph_nodes edges=graph_edges /> }
						})
				}}
			</div>
		</div>
	}
}

#[component]
fn StatCard(label: &'static str, value: usize) -> impl IntoView {
	view! {
		<div class="stat-card">
			<p class="stat-label">{label}</p>
			<p class="stat-value">{value}</p>
		</div>
	}
}

/// Side panel showing the selected node's attributes and connections.
#[component]
fn DetailPanel(
	node: Node,
	#[prop(into)] nodes: Signal<Vec<Node>>,
	#[prop(into)] edges: Signal<Vec<Edge>>,
) -> impl IntoView {
	let id = node.id.clone();
	let connections = move || {
		let names: std::collections::HashMap<String, String> =
			nodes.get().into_iter().map(|n| (n.id, n.name)).collect();
		edges
			.get()
			.into_iter()
			.filter(|e| e.touches(&id))
			.map(|e| {
				let other = if e.source == id { &e.target } else { &e.source };
				let other_name = names
					.get(other)
					.cloned()
					.unwrap_or_else(|| "Unknown".into());
				view! {
					<li>
						<span class="edge-kind">{e.kind.clone()}</span>
						" → "
						{other_name}
					</li>
				}
			})
			.collect_view()
	};

	view! {
		<div class="detail-panel">
			<h3>{node.name.clone()}</h3>
			<p class="detail-kind">{node.kind.label()}</p>
			<ul class="detail-attributes">
				{node
					.attributes
					.pairs()
					.into_iter()
					.map(|(key, value)| {
						view! {
							<li>
								<b>{key}</b>
								": "
								{value}
							</li>
						}
					})
					.collect_view()}
				{node
					.created_at
					.clone()
					.map(|created| {
						view! {
							<li>
								<b>"created"</b>
								": "
								{created}
							</li>
						}
					})}
			</ul>
			<p class="detail-heading">"Connections:"</p>
			<ul class="detail-connections">{connections}</ul>
		</div>
	}
}
