//! Positioned output of either layout pipeline.
//!
//! Coordinates are layout-local with the viewport center at the origin.
//! The renderer applies the [`Viewport`](super::viewport::Viewport)
//! transform on top; nothing here knows about it.

use log::info;
use rand::Rng;

use super::error::Error;
use super::force::{ForceConfig, Particle, Relaxation, Spring, phyllotaxis};
use super::graph::{Graph, Node};
use super::radial::{self, RadialOptions};
use super::rings::{Ring, RingConfig, RingPlacement};
use super::tree::{ContainmentTree, ContainmentTreeBuilder, TreeConfig};

/// Label family of a node, used for styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	/// The synthetic tree apex.
	Root,
	Layer,
	Module,
	Policy,
	Service,
	Taxonomy,
	Data,
	Event,
	Other,
}

impl NodeKind {
	pub fn of(node: &Node) -> Self {
		let has = |labels: &[&str]| labels.iter().any(|l| node.has_label(l));
		if has(&["Layer"]) {
			NodeKind::Layer
		} else if has(&["Module"]) {
			NodeKind::Module
		} else if has(&["Policy"]) {
			NodeKind::Policy
		} else if has(&["Service", "UpstreamChannel", "ModelEndpoint"]) {
			NodeKind::Service
		} else if has(&["Taxonomy", "ModelTag", "ModelGroup"]) {
			NodeKind::Taxonomy
		} else if has(&["Data", "Spatial"]) {
			NodeKind::Data
		} else if has(&["Event", "Temporal"]) {
			NodeKind::Event
		} else {
			NodeKind::Other
		}
	}
}

/// One drawable node.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenePoint {
	/// Backing graph node; `None` for the synthetic tree root.
	pub node: Option<usize>,
	pub kind: NodeKind,
	pub x: f64,
	pub y: f64,
	/// Tree depth (tree view only).
	pub depth: Option<usize>,
	/// Midpoint angle in radians, 0 at the top (tree view only).
	pub angle: Option<f64>,
	/// Held in place during relaxation.
	pub fixed: bool,
}

/// One drawable edge between two scene points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEdge {
	pub from: usize,
	pub to: usize,
	/// Backing relationship; `None` for tree parent/child edges.
	pub relationship: Option<usize>,
}

/// Everything the renderer draws.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	pub points: Vec<ScenePoint>,
	pub edges: Vec<SceneEdge>,
	pub rings: Vec<Ring>,
	/// Set when the layout had nothing to show, e.g. no tree roots.
	pub notice: Option<Error>,
}

impl Scene {
	/// Radial containment tree for a `width` x `height` viewport.
	pub fn tree_view(graph: &Graph, config: &TreeConfig, width: f64, height: f64) -> Self {
		let builder = ContainmentTreeBuilder::new(config.clone());
		let (mut tree, notice) = match builder.try_build(graph) {
			Ok(tree) => (tree, None),
			Err(err) => (ContainmentTree::empty(), Some(err)),
		};
		let summary = radial::annotate(&mut tree, &RadialOptions::new(width, height, config.margin));

		let points = tree
			.nodes()
			.iter()
			.map(|t| ScenePoint {
				node: t.node,
				kind: t
					.node
					.map_or(NodeKind::Root, |idx| NodeKind::of(&graph.nodes()[idx])),
				x: t.x,
				y: t.y,
				depth: Some(t.depth),
				angle: Some(t.angle),
				fixed: true,
			})
			.collect();
		let edges = tree
			.edges()
			.map(|(from, to)| SceneEdge {
				from,
				to,
				relationship: None,
			})
			.collect();

		Self {
			points,
			edges,
			rings: summary.depth_rings(),
			notice,
		}
	}

	/// Ring-seeded module layout. Returns the seed scene and the relaxation
	/// that refines it; point `i`, particle `i` and graph node `i` coincide.
	pub fn module_view<R: Rng>(
		graph: &Graph,
		rings: &RingConfig,
		force: &ForceConfig,
		width: f64,
		height: f64,
		rng: &mut R,
	) -> (Self, Relaxation) {
		let placement = RingPlacement::place(graph, rings, width, height, rng);

		let mut free = 0;
		let particles: Vec<Particle> = (0..graph.len())
			.map(|idx| match placement.position(idx) {
				Some((x, y)) => Particle::fixed(x, y),
				None => {
					let (x, y) = phyllotaxis(free);
					free += 1;
					Particle::free(x, y)
				}
			})
			.collect();

		let springs = graph
			.relationships()
			.iter()
			.enumerate()
			.map(|(rel, r)| {
				let (source, target) = graph.endpoints(rel);
				let between_anchors = placement.is_anchor(source) && placement.is_anchor(target);
				Spring {
					source,
					target,
					length: force.spring_length(&r.rel_type, between_anchors, placement.core_radius()),
				}
			})
			.collect::<Vec<_>>();

		let points = graph
			.nodes()
			.iter()
			.zip(&particles)
			.enumerate()
			.map(|(idx, (node, p))| ScenePoint {
				node: Some(idx),
				kind: NodeKind::of(node),
				x: p.x,
				y: p.y,
				depth: None,
				angle: None,
				fixed: p.fixed,
			})
			.collect();
		let edges = springs
			.iter()
			.enumerate()
			.map(|(rel, s)| SceneEdge {
				from: s.source,
				to: s.target,
				relationship: Some(rel),
			})
			.collect();

		info!(
			"module view: {} anchors, {} free nodes, {} springs",
			placement.anchors().len(),
			free,
			springs.len()
		);
		let scene = Self {
			points,
			edges,
			rings: placement.rings().to_vec(),
			notice: None,
		};
		(scene, Relaxation::new(particles, springs, force.clone()))
	}

	/// Copy the relaxation's current positions into the scene.
	pub fn sync(&mut self, relaxation: &Relaxation) {
		for (point, p) in self.points.iter_mut().zip(relaxation.particles()) {
			point.x = p.x;
			point.y = p.y;
		}
	}

	pub fn is_empty(&self) -> bool {
		self.points.iter().all(|p| p.node.is_none())
	}

	/// Resolved endpoint coordinates of `edge`.
	pub fn edge_endpoints(&self, edge: &SceneEdge) -> ((f64, f64), (f64, f64)) {
		let (a, b) = (&self.points[edge.from], &self.points[edge.to]);
		((a.x, a.y), (b.x, b.y))
	}

	/// Nearest point within `radius` of layout position `(x, y)`.
	pub fn point_at(&self, x: f64, y: f64, radius: f64) -> Option<usize> {
		self.points
			.iter()
			.enumerate()
			.map(|(idx, p)| (idx, (p.x - x).hypot(p.y - y)))
			.filter(|&(_, d)| d <= radius)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(idx, _)| idx)
	}

	/// Scene point showing graph node `node`.
	pub fn point_of(&self, node: usize) -> Option<usize> {
		self.points.iter().position(|p| p.node == Some(node))
	}

	/// Points sharing an edge with `point`.
	pub fn neighbors(&self, point: usize) -> Vec<usize> {
		let mut out: Vec<usize> = self
			.edges
			.iter()
			.filter_map(|e| {
				if e.from == point {
					Some(e.to)
				} else if e.to == point {
					Some(e.from)
				} else {
					None
				}
			})
			.collect();
		out.sort_unstable();
		out.dedup();
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::graph::Relationship;
	use crate::layout::tree::ROOT;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn graph() -> Graph {
		Graph::build(
			vec![
				Node::new("L", &["Layer"]),
				Node::new("m1", &["Module"]),
				Node::new("m2", &["Module"]),
				Node::new("p", &["Policy"]),
				Node::new("free", &["Event"]),
			],
			vec![
				Relationship::new("L", "m1", "CONTAINS"),
				Relationship::new("L", "m2", "CONTAINS"),
				Relationship::new("m1", "m2", "DEPENDS_ON"),
				Relationship::new("p", "m2", "GOVERNS"),
				Relationship::new("free", "p", "EMITS"),
			],
		)
	}

	#[test]
	fn test_tree_view_scene() {
		let g = graph();
		let scene = Scene::tree_view(&g, &TreeConfig::default(), 600.0, 600.0);
		assert!(scene.notice.is_none());
		assert_eq!(scene.points.len(), 4);
		assert_eq!(scene.points[ROOT].kind, NodeKind::Root);
		assert_eq!(scene.points[1].kind, NodeKind::Layer);
		assert_eq!(scene.edges.len(), 3);
		assert_eq!(scene.rings.len(), 2);
		assert_eq!(scene.neighbors(1), [0, 2, 3]);
		let ((x1, y1), (x2, y2)) = scene.edge_endpoints(&scene.edges[0]);
		assert_eq!((x1, y1), (0.0, 0.0));
		assert_eq!((x2, y2), (scene.points[1].x, scene.points[1].y));
	}

	#[test]
	fn test_tree_view_without_roots() {
		let g = Graph::build(vec![Node::new("m", &["Module"])], vec![]);
		let scene = Scene::tree_view(&g, &TreeConfig::default(), 600.0, 600.0);
		assert!(scene.is_empty());
		assert!(matches!(scene.notice, Some(Error::EmptyGraph { .. })));
	}

	#[test]
	fn test_module_view_pins_and_relaxes() {
		let g = graph();
		let mut rng = StdRng::seed_from_u64(9);
		let (mut scene, mut sim) = Scene::module_view(
			&g,
			&RingConfig::default(),
			&ForceConfig::default(),
			800.0,
			600.0,
			&mut rng,
		);
		// L (CONTAINS) and p (GOVERNS) ride rings; `free` only touches p.
		let fixed: Vec<bool> = scene.points.iter().map(|p| p.fixed).collect();
		assert_eq!(fixed, [true, true, true, true, false]);
		let seeded = scene.clone();

		sim.run();
		scene.sync(&sim);
		for (before, after) in seeded.points.iter().zip(&scene.points) {
			if before.fixed {
				assert_eq!((before.x, before.y), (after.x, after.y));
			}
		}
		assert_ne!(seeded.points[4], scene.points[4]);

		// Anchor pair spring uses the core radius.
		let anchor_spring = sim.springs()[2];
		assert!((anchor_spring.length - 600.0 * 0.28 * 0.75).abs() < 1e-9);
		assert_eq!(sim.springs()[3].length, 120.0);
	}

	#[test]
	fn test_point_at() {
		let g = graph();
		let scene = Scene::tree_view(&g, &TreeConfig::default(), 600.0, 600.0);
		let p = &scene.points[2];
		assert_eq!(scene.point_at(p.x + 1.0, p.y, 5.0), Some(2));
		assert_eq!(scene.point_at(1e6, 1e6, 5.0), None);
		assert_eq!(scene.point_of(1), Some(2));
	}

	#[test]
	fn test_node_kind() {
		assert_eq!(NodeKind::of(&Node::new("a", &["ModelEndpoint"])), NodeKind::Service);
		assert_eq!(NodeKind::of(&Node::new("a", &["Temporal"])), NodeKind::Event);
		assert_eq!(NodeKind::of(&Node::new("a", &["Layer", "Module"])), NodeKind::Layer);
		assert_eq!(NodeKind::of(&Node::new("a", &[])), NodeKind::Other);
	}
}
