use std::collections::HashSet;
use std::sync::Arc;

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::layout::{Graph, LayoutConfig, NodeKind, RelaxStatus, Relaxation, Scene, SceneEdge, Viewport};

use super::types::ViewMode;

/// Pick distance around a node, in layout units.
pub const HIT_RADIUS: f64 = 12.0;

/// Drags shorter than this still count as a click.
const CLICK_SLOP: f64 = 3.0;

/// Background drag in progress, in canvas pixels.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub last_x: f64,
	pub last_y: f64,
	/// Path length so far, used to tell clicks from drags.
	pub travelled: f64,
}

/// Point under the cursor and the points it shares an edge with.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	/// Scene point index.
	pub point: Option<usize>,
	pub neighbors: HashSet<usize>,
}

/// Everything one canvas needs between frames. Replaced wholesale on
/// every dataset load, view switch or resize, which also drops any
/// relaxation still in flight.
pub struct CanvasState {
	pub graph: Arc<Graph>,
	pub mode: ViewMode,
	pub scene: Scene,
	pub viewport: Viewport,
	pub pan: PanState,
	pub hover: HoverState,
	/// Scene point index of the selected node.
	pub selected: Option<usize>,
	/// Dim everything except modules and module-to-module edges.
	pub core_highlight: bool,
	pub width: f64,
	pub height: f64,
	config: LayoutConfig,
	relaxation: Option<Relaxation>,
}

impl CanvasState {
	/// Lay out `graph` for `mode` on a canvas of the given size. The module
	/// view starts its relaxation here.
	pub fn new(graph: Arc<Graph>, mode: ViewMode, config: LayoutConfig, width: f64, height: f64) -> Self {
		let mut state = Self {
			graph,
			mode,
			scene: Scene::default(),
			viewport: Viewport::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			selected: None,
			core_highlight: false,
			width,
			height,
			config,
			relaxation: None,
		};
		state.relayout();
		state
	}

	/// Rebuild the scene from scratch for the current size and mode.
	pub fn relayout(&mut self) {
		match self.mode {
			ViewMode::Tree => {
				self.scene = Scene::tree_view(&self.graph, &self.config.tree, self.width, self.height);
				self.relaxation = None;
			}
			ViewMode::Module => {
				let mut rng = StdRng::from_entropy();
				let (scene, relaxation) = Scene::module_view(
					&self.graph,
					&self.config.rings,
					&self.config.force,
					self.width,
					self.height,
					&mut rng,
				);
				self.scene = scene;
				self.relaxation = Some(relaxation);
			}
		}
		self.hover = HoverState::default();
		self.selected = None;
	}

	/// Lay out again for a new canvas size. The selected node stays
	/// selected.
	pub fn resize(&mut self, width: f64, height: f64) {
		let selected = self.selected.and_then(|p| self.scene.points.get(p)?.node);
		self.width = width;
		self.height = height;
		self.relayout();
		self.selected = selected.and_then(|idx| self.scene.point_of(idx));
	}

	/// Select the point showing graph node `id`; `None` clears.
	pub fn select_id(&mut self, id: Option<&str>) {
		self.selected = id
			.and_then(|id| self.graph.index_of(id))
			.and_then(|idx| self.scene.point_of(idx));
	}

	pub fn is_relaxing(&self) -> bool {
		self.relaxation.is_some()
	}

	/// Advance the relaxation by one tick, if one is running.
	pub fn tick(&mut self) {
		let Some(relaxation) = self.relaxation.as_mut() else {
			return;
		};
		let status = relaxation.tick();
		self.scene.sync(relaxation);
		if status != RelaxStatus::Running {
			debug!("relaxation finished after {} ticks: {status:?}", relaxation.ticks());
			self.relaxation = None;
		}
	}

	/// Canvas pixel to the centered frame the viewport works in.
	pub fn centered(&self, sx: f64, sy: f64) -> (f64, f64) {
		(sx - self.width / 2.0, sy - self.height / 2.0)
	}

	/// Canvas pixel to layout coordinates.
	pub fn screen_to_layout(&self, sx: f64, sy: f64) -> (f64, f64) {
		let (cx, cy) = self.centered(sx, sy);
		self.viewport.screen_to_layout(cx, cy)
	}

	/// Scene point under a canvas pixel.
	pub fn point_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (x, y) = self.screen_to_layout(sx, sy);
		// HIT_RADIUS is in layout space, so it scales with zoom like nodes.
		self.scene.point_at(x, y, HIT_RADIUS)
	}

	/// Graph id shown by scene point `point`.
	pub fn node_id(&self, point: usize) -> Option<String> {
		let idx = self.scene.points.get(point)?.node?;
		Some(self.graph.nodes()[idx].id.clone())
	}

	/// Wheel zoom about a canvas pixel.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let (cx, cy) = self.centered(sx, sy);
		self.viewport.zoom(cx, cy, Viewport::wheel_factor(delta_y));
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			last_x: sx,
			last_y: sy,
			travelled: 0.0,
		};
	}

	pub fn drag_pan(&mut self, sx: f64, sy: f64) {
		let (dx, dy) = (sx - self.pan.last_x, sy - self.pan.last_y);
		self.viewport.pan(dx, dy);
		self.pan.last_x = sx;
		self.pan.last_y = sy;
		self.pan.travelled += dx.hypot(dy);
	}

	/// Ends the pan; true when the gesture was a click rather than a drag.
	pub fn end_pan(&mut self) -> bool {
		let was_click = self.pan.active && self.pan.travelled < CLICK_SLOP;
		self.pan = PanState::default();
		was_click
	}

	pub fn set_hover(&mut self, point: Option<usize>) {
		if self.hover.point == point {
			return;
		}
		self.hover.point = point;
		self.hover.neighbors = point
			.map(|p| self.scene.neighbors(p).into_iter().collect())
			.unwrap_or_default();
	}

	pub fn is_highlighted(&self, point: usize) -> bool {
		self.hover.point == Some(point) || self.hover.neighbors.contains(&point)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.point.is_some()
	}

	fn is_core(&self, point: usize) -> bool {
		self.scene.points[point].kind == NodeKind::Module
	}

	/// Drawn faded: outside the hover neighborhood, or not a module while
	/// core highlighting is on.
	pub fn is_dimmed(&self, point: usize) -> bool {
		(self.core_highlight && !self.is_core(point))
			|| (self.has_active_highlight() && !self.is_highlighted(point))
	}

	/// Same rule as [`CanvasState::is_dimmed`], applied to both endpoints.
	pub fn is_edge_dimmed(&self, edge: &SceneEdge) -> bool {
		(self.core_highlight && !(self.is_core(edge.from) && self.is_core(edge.to)))
			|| (self.has_active_highlight()
				&& !(self.is_highlighted(edge.from) && self.is_highlighted(edge.to)))
	}
}
