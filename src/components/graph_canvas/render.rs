use std::f64::consts::{FRAC_PI_2, PI, TAU};

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::layout::{NodeKind, ScenePoint};

use super::state::CanvasState;
use super::types::{ViewMode, kind_color};

const BACKGROUND: &str = "#1a1a2e";
const ROOT_LABEL: &str = "System Architecture";

fn radius(mode: ViewMode, kind: NodeKind) -> f64 {
	match (mode, kind) {
		(ViewMode::Tree, NodeKind::Root) => 8.0,
		(ViewMode::Tree, NodeKind::Layer) => 6.0,
		(ViewMode::Tree, _) => 5.0,
		(ViewMode::Module, NodeKind::Layer) => 16.0,
		(ViewMode::Module, NodeKind::Module) => 12.0,
		(ViewMode::Module, NodeKind::Policy) => 9.0,
		(ViewMode::Module, NodeKind::Service) => 8.0,
		(ViewMode::Module, NodeKind::Taxonomy) => 6.5,
		(ViewMode::Module, _) => 7.5,
	}
}

/// Fill the canvas with the background color.
pub fn clear(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
}

/// Draw one frame of `state`.
pub fn render(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	clear(ctx, state.width, state.height);
	if let Some(notice) = &state.scene.notice {
		ctx.set_font("14px sans-serif");
		ctx.set_fill_style_str("rgba(255, 255, 255, 0.6)");
		ctx.set_text_align("center");
		let _ = ctx.fill_text(&notice.to_string(), state.width / 2.0, state.height / 2.0);
		ctx.set_text_align("start");
		return;
	}
	ctx.save();
	let v = state.viewport;
	let _ = ctx.translate(
		state.width / 2.0 + v.translate_x,
		state.height / 2.0 + v.translate_y,
	);
	let _ = ctx.scale(v.scale, v.scale);
	draw_rings(state, ctx);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	draw_labels(state, ctx);
	ctx.restore();
}

fn draw_rings(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.viewport.scale;
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.12)");
	ctx.set_line_width(1.0 / k);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(4.0 / k),
		&JsValue::from_f64(4.0 / k),
	));
	for ring in &state.scene.rings {
		ctx.begin_path();
		let _ = ctx.arc(ring.center_x, ring.center_y, ring.radius, 0.0, TAU);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_edges(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.viewport.scale;
	let has_highlight = state.has_active_highlight();
	let arrows = state.mode == ViewMode::Module;
	let arrow_size = 6.0 / k;

	for edge in &state.scene.edges {
		let ((x1, y1), (x2, y2)) = state.scene.edge_endpoints(edge);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = dx.hypot(dy);
		if dist < 0.001 {
			continue;
		}

		let alpha = if state.is_edge_dimmed(edge) {
			0.12
		} else if has_highlight {
			0.9
		} else {
			0.5
		};
		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {alpha})"));
		ctx.set_line_width(1.2 / k);

		let target_radius = radius(state.mode, state.scene.points[edge.to].kind);
		let (ux, uy) = (dx / dist, dy / dist);
		let end = if arrows {
			target_radius + arrow_size
		} else {
			0.0
		};
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2 - ux * end, y2 - uy * end);
		ctx.stroke();

		if !arrows {
			continue;
		}
		ctx.set_fill_style_str(&format!("rgba(100, 180, 255, {alpha})"));
		let (tip_x, tip_y) = (x2 - ux * target_radius, y2 - uy * target_radius);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
}

fn draw_nodes(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.viewport.scale;

	for (idx, point) in state.scene.points.iter().enumerate() {
		let r = radius(state.mode, point.kind);
		ctx.set_global_alpha(if state.is_dimmed(idx) { 0.3 } else { 1.0 });
		ctx.begin_path();
		let _ = ctx.arc(point.x, point.y, r, 0.0, TAU);
		ctx.set_fill_style_str(kind_color(point.kind));
		ctx.fill();

		if state.selected == Some(idx) || state.hover.point == Some(idx) {
			ctx.begin_path();
			let _ = ctx.arc(point.x, point.y, r + 2.0 / k, 0.0, TAU);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.8)");
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}
	}
	ctx.set_global_alpha(1.0);
}

fn label(state: &CanvasState, point: &ScenePoint) -> Option<String> {
	let labeled = match state.mode {
		ViewMode::Tree => matches!(point.kind, NodeKind::Root | NodeKind::Layer | NodeKind::Module),
		ViewMode::Module => point.kind == NodeKind::Module,
	};
	if !labeled {
		return None;
	}
	match point.node {
		None => Some(ROOT_LABEL.to_string()),
		Some(idx) => Some(state.graph.nodes()[idx].name().to_string()),
	}
}

fn draw_labels(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.viewport.scale;
	ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.85)");

	for point in &state.scene.points {
		let Some(text) = label(state, point) else {
			continue;
		};
		match (state.mode, point.angle) {
			(ViewMode::Tree, Some(angle)) => {
				// Text on the left half of the circle reads outward to the left.
				let screen_angle = angle - FRAC_PI_2;
				let left = screen_angle > FRAC_PI_2 && screen_angle < PI + FRAC_PI_2;
				let (align, dx) = if left { ("end", -8.0) } else { ("start", 8.0) };
				ctx.set_text_align(align);
				let _ = ctx.fill_text(&text, point.x + dx, point.y + 4.0);
			}
			_ => {
				ctx.set_text_align("center");
				let r = radius(state.mode, point.kind);
				let _ = ctx.fill_text(&text, point.x, point.y - r - 4.0);
			}
		}
	}
	ctx.set_text_align("start");
}
