//! Canvas 2D drawing for the twin graph.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::TwinGraphState;

const BACKGROUND: &str = "#ffffff";
const EDGE_COLOR: &str = "#999999";
const EDGE_HIGHLIGHT: &str = "#ef4444";
const LABEL_COLOR: &str = "#333333";
const EDGE_LABEL_COLOR: &str = "#666666";

pub fn render(state: &TwinGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &TwinGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let nodes = state.sim.nodes();
	let has_selection = state.selection.is_active();

	for link in state.sim.links() {
		let (source, target) = (&nodes[link.source], &nodes[link.target]);
		let highlighted = state.selection.edges.contains(&link.key);

		let (color, width, alpha) = if highlighted {
			(EDGE_HIGHLIGHT, 3.0 / k, 0.9)
		} else if has_selection {
			(EDGE_COLOR, 2.0 / k, 0.15)
		} else {
			(EDGE_COLOR, 2.0 / k, 0.6)
		};
		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(width);

		// Synthesized participation/assignment edges are dashed, explicit
		// relationships solid.
		if link.kind == "participates_in" || link.kind == "assigned_space" {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(6.0 / k),
				&JsValue::from_f64(4.0 / k),
			));
		} else {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		ctx.begin_path();
		ctx.move_to(source.x, source.y);
		ctx.line_to(target.x, target.y);
		ctx.stroke();

		ctx.set_fill_style_str(EDGE_LABEL_COLOR);
		ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
		ctx.set_text_align("center");
		let _ = ctx.fill_text(
			&link.kind,
			(source.x + target.x) / 2.0,
			(source.y + target.y) / 2.0 - 5.0 / k,
		);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	ctx.set_global_alpha(1.0);
	ctx.set_text_align("left");
}

fn draw_nodes(state: &TwinGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let has_selection = state.selection.is_active();

	for node in state.sim.nodes() {
		let radius = node.kind.radius();
		let is_selected = state.selection.node.as_deref() == Some(node.id.as_str());
		let is_neighbor = state.selection.neighbors.contains(&node.id);

		let alpha = if has_selection && !is_selected && !is_neighbor {
			0.3
		} else {
			1.0
		};
		ctx.set_global_alpha(alpha);

		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.kind.color());
		ctx.fill();

		let (ring, ring_width) = if is_selected {
			("#ff0000", 4.0)
		} else if is_neighbor {
			("#ff9999", 3.0)
		} else {
			("#ffffff", 2.0)
		};
		ctx.set_stroke_style_str(ring);
		ctx.set_line_width(ring_width / k);
		ctx.stroke();

		let label = if node.name.chars().count() > 12 {
			let short: String = node.name.chars().take(12).collect();
			format!("{short}...")
		} else {
			node.name.clone()
		};
		ctx.set_text_align("center");
		ctx.set_fill_style_str(LABEL_COLOR);
		ctx.set_font(&format!("bold {}px sans-serif", 12.0 / k.max(0.5)));
		let _ = ctx.fill_text(&label, node.x, node.y + radius + 14.0 / k);
		ctx.set_fill_style_str(EDGE_LABEL_COLOR);
		ctx.set_font(&format!("{}px sans-serif", 8.0 / k.max(0.5)));
		let _ = ctx.fill_text(node.kind.label(), node.x, node.y + radius + 24.0 / k);
	}
	ctx.set_global_alpha(1.0);
	ctx.set_text_align("left");
}
