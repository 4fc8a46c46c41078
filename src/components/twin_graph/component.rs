//! Leptos canvas component: owns the interaction state for the currently
//! displayed subgraph and drives the animation-frame loop.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::TwinGraphState;
use super::types::{Edge, Node};

/// Pointer travel below this many pixels counts as a click, not a drag.
const CLICK_SLOP: f64 = 4.0;

/// Interactive force-directed canvas over a filtered node/edge set.
///
/// Whenever `nodes`/`edges` change, the previous state (and with it the
/// running simulation) is replaced wholesale and the pending animation
/// frame is cancelled, so exactly one simulation ever writes positions
/// for this canvas.
#[component]
pub fn TwinGraphCanvas(
	#[prop(into)] nodes: Signal<Vec<Node>>,
	#[prop(into)] edges: Signal<Vec<Edge>>,
	/// Selected node id, reported back to the page for the detail panel.
	selected: RwSignal<Option<String>>,
	/// Invoked with a node id on double-click, to refocus the subgraph.
	#[prop(optional, into)] on_focus: Option<Callback<String>>,
	#[prop(default = 800.0)] width: f64,
	#[prop(default = 600.0)] height: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<TwinGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let raf_handle: Rc<RefCell<Option<i32>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, raf_init) = (state.clone(), animate.clone(), raf_handle.clone());

	Effect::new(move |_| {
		// Tracks the subgraph signals: reruns on every input-set change.
		let (node_set, edge_set) = (nodes.get(), edges.get());
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window = web_sys::window().unwrap();

		// A new subgraph replaces the old simulation and cancels its
		// pending frame before anything else runs.
		if let Some(handle) = raf_init.borrow_mut().take() {
			let _ = window.cancel_animation_frame(handle);
		}
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		*state_init.borrow_mut() = Some(TwinGraphState::new(&node_set, &edge_set, width, height));
		selected.set(None);

		let (state_anim, animate_inner, raf_inner) =
			(state_init.clone(), animate_init.clone(), raf_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick();
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let handle = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref())
					.unwrap_or(0);
				*raf_inner.borrow_mut() = Some(handle);
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let handle = window
				.request_animation_frame(cb.as_ref().unchecked_ref())
				.unwrap_or(0);
			*raf_init.borrow_mut() = Some(handle);
		}
	});

	// Dropping the component cancels the loop for good.
	let cleanup_handles = leptos::__reexports::send_wrapper::SendWrapper::new((
		raf_handle.clone(),
		animate.clone(),
	));
	on_cleanup(move || {
		let (raf_cleanup, animate_cleanup) = cleanup_handles.take();
		if let Some(handle) = raf_cleanup.borrow_mut().take() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(handle);
			}
		}
		animate_cleanup.borrow_mut().take();
	});

	let pointer = move |ev: &MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		)
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let (x, y) = pointer(&ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(id) = s.node_at_position(x, y) {
				s.start_drag(&id, x, y);
			} else {
				s.start_pan(x, y);
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let (x, y) = pointer(&ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag.active {
				s.drag_to(x, y);
			} else if s.pan.active {
				s.pan_to(x, y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let (x, y) = pointer(&ev);
		let mut clicked: Option<Option<String>> = None;
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if s.drag.active {
				let travel = (x - s.drag.start_x).hypot(y - s.drag.start_y);
				let id = s.drag.node.clone();
				s.end_drag();
				if travel < CLICK_SLOP {
					if let Some(id) = id {
						s.select(&id);
						clicked = Some(Some(id));
					}
				}
			} else if s.pan.active {
				let travel = (x - s.pan.start_x).hypot(y - s.pan.start_y);
				s.end_pan();
				if travel < CLICK_SLOP {
					s.clear_selection();
					clicked = Some(None);
				}
			}
		}
		// Signal writes happen after the state borrow is released.
		if let Some(selection) = clicked {
			selected.set(selection);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			if s.drag.active {
				s.end_drag();
			}
			s.end_pan();
		}
	};

	let state_dc = state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let (x, y) = pointer(&ev);
		let hit = state_dc
			.borrow()
			.as_ref()
			.and_then(|s| s.node_at_position(x, y));
		if let (Some(id), Some(cb)) = (hit, on_focus) {
			cb.run(id);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let (x, y) = pointer(&ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="twin-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			on:wheel=on_wheel
			style="display: block; cursor: grab; border: 1px solid #e5e7eb; border-radius: 8px;"
		/>
	}
}
