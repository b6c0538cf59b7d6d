use std::collections::HashSet;

use property_graph_canvas::layout::radial::{self, RadialOptions};
use property_graph_canvas::layout::{
	ContainmentTreeBuilder, ForceConfig, Graph, Node, Relationship, RingConfig, RingPlacement,
	Scene, TreeConfig, Viewport,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

const EPS: f64 = 1e-9;

#[test]
fn layer_with_two_modules_splits_its_span() {
	let g = Graph::build(
		vec![
			Node::new("L1", &["Layer"]),
			Node::new("M1", &["Module"]),
			Node::new("M2", &["Module"]),
		],
		vec![
			Relationship::new("L1", "M1", "CONTAINS"),
			Relationship::new("L1", "M2", "CONTAINS"),
		],
	);
	let mut tree = ContainmentTreeBuilder::default().build(&g);
	radial::annotate(&mut tree, &RadialOptions::new(800.0, 800.0, 40.0));

	assert_eq!(tree.roots().len(), 1);
	let l1 = tree.get(tree.roots()[0]);
	assert_eq!(g.nodes()[l1.node.unwrap()].id, "L1");
	assert_eq!(l1.children.len(), 2);

	let names: Vec<_> = l1
		.children
		.iter()
		.map(|&c| g.nodes()[tree.get(c).node.unwrap()].id.as_str())
		.collect();
	assert_eq!(names, ["M1", "M2"]);
	for &c in &l1.children {
		let child = tree.get(c);
		assert_eq!(child.leaf_count, 1);
		assert!((child.span() - l1.span() / 2.0).abs() < EPS);
	}
}

#[test]
fn dangling_containment_is_dropped_before_the_tree() {
	let g = Graph::build(
		vec![Node::new("X", &["Layer"])],
		vec![Relationship::new("X", "Y", "CONTAINS")],
	);
	assert!(g.relationships().is_empty());
	assert!(g.outgoing("X").is_empty());
	assert_eq!(g.diagnostics().len(), 1);

	let tree = ContainmentTreeBuilder::default().build(&g);
	assert_eq!(tree.len(), 2);
	assert!(tree.nodes().iter().all(|t| t.node.is_none_or(|idx| g.nodes()[idx].id != "Y")));
}

#[test]
fn shared_neighbor_goes_to_first_anchor() {
	let g = Graph::build(
		vec![
			Node::new("A1", &["Module"]),
			Node::new("A2", &["Module"]),
			Node::new("N", &["Service"]),
			Node::new("K", &["Service"]),
		],
		vec![
			Relationship::new("A1", "N", "DEPENDS_ON"),
			Relationship::new("A2", "N", "DEPENDS_ON"),
			Relationship::new("A2", "K", "DEPENDS_ON"),
		],
	);
	let config = RingConfig::default();
	let mut rng = StdRng::seed_from_u64(11);
	let placement = RingPlacement::place(&g, &config, 600.0, 600.0, &mut rng);

	let (a1, a2, n, k) = (0, 1, 2, 3);
	assert_eq!(placement.anchors(), &[a1, a2]);
	assert_eq!(placement.claimed_by(n), Some(a1));
	assert_eq!(placement.claimed_by(k), Some(a2));

	let (ax, ay) = placement.position(a1).unwrap();
	let (nx, ny) = placement.position(n).unwrap();
	assert!(((nx - ax).hypot(ny - ay) - config.ring_radius(0)).abs() < 1e-6);
}

#[test]
fn zoom_clamps_at_max_and_keeps_cursor() {
	let mut v = Viewport {
		scale: 4.0,
		translate_x: -30.0,
		translate_y: 12.0,
	};
	let (cx, cy) = (250.0, -80.0);
	let under_cursor = v.screen_to_layout(cx, cy);
	v.zoom(cx, cy, 10.0);
	assert_eq!(v.scale, 5.0);
	let (sx, sy) = v.layout_to_screen(under_cursor.0, under_cursor.1);
	assert!((sx - cx).abs() < 1e-9);
	assert!((sy - cy).abs() < 1e-9);
}

#[test]
fn forest_invariant_on_a_tangled_graph() {
	let ids: Vec<String> = (0..30).map(|i| format!("n{i}")).collect();
	let mut nodes: Vec<Node> = ids.iter().map(|id| Node::new(id.clone(), &[])).collect();
	nodes[0] = Node::new("n0", &["Layer"]);
	nodes[7] = Node::new("n7", &["Layer"]);
	let mut rels = Vec::new();
	for i in 0..30usize {
		for j in [(i * 7 + 3) % 30, (i * 11 + 5) % 30, (i + 1) % 30] {
			rels.push(Relationship::new(ids[i].clone(), ids[j].clone(), "CONTAINS"));
		}
	}
	let g = Graph::build(nodes, rels);
	let mut tree = ContainmentTreeBuilder::new(TreeConfig::default()).build(&g);
	radial::annotate(&mut tree, &RadialOptions::new(640.0, 480.0, 20.0));

	let mut seen = HashSet::new();
	for t in tree.nodes() {
		if let Some(idx) = t.node {
			assert!(seen.insert(idx), "node {idx} attached twice");
		}
	}
	let leaves = tree.nodes().iter().filter(|t| t.is_leaf()).count();
	assert_eq!(tree.get(0).leaf_count, leaves);
}

#[test]
fn module_view_never_moves_pinned_nodes() {
	let mut nodes = vec![
		Node::new("m1", &["Module"]).with_prop("layer", "Orchestration"),
		Node::new("m2", &["Module"]).with_prop("layer", "Execution"),
	];
	let mut rels = vec![Relationship::new("m1", "m2", "DEPENDS_ON")];
	for i in 0..12 {
		let id = format!("x{i}");
		nodes.push(Node::new(id.clone(), &["Data"]));
		if i % 3 == 0 {
			rels.push(Relationship::new("m1", id.clone(), "PROVIDES"));
		} else if i > 0 {
			rels.push(Relationship::new(format!("x{}", i - 1), id.clone(), "PERTAINS_TO"));
		}
	}
	let g = Graph::build(nodes, rels);
	let mut rng = StdRng::seed_from_u64(2024);
	let (seed, mut sim) = Scene::module_view(
		&g,
		&RingConfig::default(),
		&ForceConfig::default(),
		900.0,
		700.0,
		&mut rng,
	);
	let mut scene = seed.clone();
	for _ in 0..25 {
		sim.tick();
		scene.sync(&sim);
		for (a, b) in seed.points.iter().zip(&scene.points) {
			if a.fixed {
				assert_eq!((a.x, a.y), (b.x, b.y));
			}
		}
	}
	assert!(scene.points.iter().any(|p| !p.fixed));
}

#[test]
fn free_chain_settles_beside_its_ring_node() {
	let g = Graph::build(
		vec![
			Node::new("m", &["Module"]),
			Node::new("r", &["Service"]),
			Node::new("f1", &["Service"]),
			Node::new("f2", &["Service"]),
		],
		vec![
			Relationship::new("m", "r", "DEPENDS_ON"),
			Relationship::new("r", "f1", "DEPENDS_ON"),
			Relationship::new("f1", "f2", "DEPENDS_ON"),
		],
	);
	let mut rng = StdRng::seed_from_u64(3);
	let (mut scene, mut sim) = Scene::module_view(
		&g,
		&RingConfig::default(),
		&ForceConfig::default(),
		600.0,
		600.0,
		&mut rng,
	);
	sim.run();
	scene.sync(&sim);

	let (r, f1, f2) = (&scene.points[1], &scene.points[2], &scene.points[3]);
	assert!(r.fixed && !f1.fixed && !f2.fixed);
	let link = (r.x - f1.x).hypot(r.y - f1.y);
	assert!(link < 160.0, "r-f1 {link}");
	let tail = (f1.x - f2.x).hypot(f1.y - f2.y);
	assert!(tail < 160.0, "f1-f2 {tail}");
}
