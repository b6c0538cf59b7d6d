use property_graph_canvas::layout::{
	ContainmentTreeBuilder, Graph, LayoutConfig, RingConfig, RingPlacement, Scene, TreeConfig,
	load_graph, load_mixed,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn full() -> Graph {
	let (graph, skipped) = load_graph(
		include_str!("../public/samples/full_nodes.jsonl"),
		include_str!("../public/samples/full_relationships.jsonl"),
	);
	assert!(skipped.is_empty(), "{skipped:?}");
	graph
}

#[test]
fn bundled_datasets_load_cleanly() {
	let g = full();
	assert_eq!(g.len(), 28);
	assert_eq!(g.relationships().len(), 39);
	assert!(g.diagnostics().is_empty());

	let (minimal, skipped) = load_graph(
		include_str!("../public/samples/minimal_nodes.jsonl"),
		include_str!("../public/samples/minimal_relationships.jsonl"),
	);
	assert!(skipped.is_empty());
	assert!(minimal.diagnostics().is_empty());
	assert_eq!(minimal.len(), 8);
}

#[test]
fn full_dataset_tree_has_one_branch_per_layer() {
	let g = full();
	let tree = ContainmentTreeBuilder::new(TreeConfig::default()).build(&g);
	assert_eq!(tree.roots().len(), 3);
	// Synthetic root, three layers and their eight modules.
	assert_eq!(tree.len(), 12);

	let scene = Scene::tree_view(&g, &TreeConfig::default(), 1200.0, 800.0);
	assert!(scene.notice.is_none());
	assert_eq!(scene.edges.len(), 11);
}

#[test]
fn full_dataset_anchors_follow_layer_order() {
	let g = full();
	let mut rng = StdRng::seed_from_u64(5);
	let placement = RingPlacement::place(&g, &RingConfig::default(), 1200.0, 800.0, &mut rng);

	assert_eq!(placement.anchors().len(), 8);
	assert_eq!(
		placement.anchors()[0],
		g.index_of("module:execution:runtime").unwrap()
	);

	let retention = g.index_of("policy:retention").unwrap();
	assert_eq!(
		placement.claimed_by(retention),
		g.index_of("module:storage:vector_store")
	);
	// Endpoints only touch channels, never an anchor.
	let gpt = g.index_of("endpoint:gpt").unwrap();
	assert!(placement.position(gpt).is_none());
}

#[test]
fn single_file_export_matches_split_files() {
	let (combined, skipped) = load_mixed(include_str!("../public/samples/combined.jsonl"));
	assert!(skipped.is_empty(), "{skipped:?}");
	assert!(combined.diagnostics().is_empty());

	let split = full();
	assert_eq!(combined.len(), split.len());
	assert_eq!(combined.relationships().len(), split.relationships().len());
	for node in split.nodes() {
		assert!(combined.index_of(&node.id).is_some(), "{} missing", node.id);
	}
}

#[test]
fn served_layout_config_parses() {
	let config = LayoutConfig::from_json(include_str!("../public/layout.json")).unwrap();
	assert_eq!(config.tree.margin, 40.0);
	assert_eq!(config.force.max_ticks, 300);
	assert_eq!(config.rings, RingConfig::default());
}
