use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use crate::layout::{Graph, LayoutConfig};

use super::render;
use super::state::CanvasState;
use super::types::ViewMode;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	let w = window.inner_width().ok()?.as_f64()?;
	let h = window.inner_height().ok()?.as_f64()?;
	Some((w, h))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Mouse position relative to the canvas' top-left corner.
fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Full-window canvas showing `graph` in the chosen view.
///
/// The layout is rebuilt whenever `graph`, `mode` or `config` changes and
/// on window resize. Bumping `reset` restores the identity viewport. Clicks
/// report the picked node id (or `None` for the background) through
/// `on_select`; `selected` feeds the selection back in.
#[component]
pub fn GraphCanvas(
	#[prop(into)] graph: Signal<Option<Arc<Graph>>>,
	#[prop(into)] mode: Signal<ViewMode>,
	#[prop(into)] config: Signal<LayoutConfig>,
	#[prop(into)] reset: Signal<u32>,
	#[prop(into)] core_highlight: Signal<bool>,
	#[prop(into)] selected: Signal<Option<String>>,
	#[prop(into)] on_select: Callback<Option<String>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<CanvasState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let graph = graph.get();
		let mode = mode.get();
		let config = config.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some((w, h)) = window_size(&window) else {
			return;
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		*state_init.borrow_mut() = graph.map(|g| {
			let mut s = CanvasState::new(g, mode, config, w, h);
			s.core_highlight = core_highlight.get_untracked();
			s
		});
		debug!("canvas rebuilt: {mode:?} at {w}x{h}");
		on_select.run(None);

		if animate_init.borrow().is_some() {
			return;
		}
		let Some(ctx) = context_2d(&canvas) else {
			warn!("canvas has no 2d context");
			return;
		};

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
				return;
			};
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			match *state_anim.borrow_mut() {
				Some(ref mut s) => {
					if s.is_relaxing() {
						s.tick();
					}
					render::render(s, &ctx);
				}
				None => render::clear(&ctx, canvas.width() as f64, canvas.height() as f64),
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_reset = state.clone();
	Effect::new(move |prev: Option<u32>| {
		let generation = reset.get();
		if prev.is_some() {
			if let Some(ref mut s) = *state_reset.borrow_mut() {
				s.viewport.reset();
			}
		}
		generation
	});

	let state_core = state.clone();
	Effect::new(move |_| {
		let on = core_highlight.get();
		if let Some(ref mut s) = *state_core.borrow_mut() {
			s.core_highlight = on;
		}
	});

	let state_sel = state.clone();
	Effect::new(move |_| {
		let id = selected.get();
		if let Some(ref mut s) = *state_sel.borrow_mut() {
			s.select_id(id.as_deref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.begin_pan(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.pan.active {
				s.drag_pan(x, y);
			} else {
				let hovered = s.point_at_position(x, y);
				s.set_hover(hovered);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		// The borrow must end before the callback runs.
		let picked = {
			let mut guard = state_mu.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			if !s.end_pan() {
				return;
			}
			let point = s.point_at_position(x, y);
			s.selected = point;
			point.and_then(|p| s.node_id(p))
		};
		on_select.run(picked);
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.end_pan();
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom_at(x, y, ev.delta_y());
		}
	};

	let state_dc = state.clone();
	let on_dblclick = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_dc.borrow_mut() {
			s.viewport.reset();
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:dblclick=on_dblclick
			style="display: block; cursor: grab;"
		/>
	}
}
