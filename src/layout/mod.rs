//! Graph layout engine: pure data in, positioned geometry out.
//!
//! Records are decoded ([`records`]) into a read-only [`Graph`]. The tree
//! view derives a containment forest ([`tree`]) and lays it out radially
//! ([`radial`]); the module view seeds anchors and rings ([`rings`]) and
//! relaxes the rest ([`force`]). Both end in a [`Scene`]. The
//! [`Viewport`] is kept apart and applied at draw time.

pub mod error;
pub mod force;
pub mod graph;
pub mod radial;
pub mod records;
pub mod rings;
pub mod scene;
pub mod tree;
pub mod viewport;

use serde::{Deserialize, Serialize};

pub use error::{Error, Result};
pub use force::{ForceConfig, RelaxStatus, Relaxation};
pub use graph::{Graph, Neighbor, Node, NodeSelector, Relationship, Selection};
pub use rings::{Ring, RingConfig, RingPlacement};
pub use scene::{NodeKind, Scene, SceneEdge, ScenePoint};
pub use tree::{ContainmentTree, ContainmentTreeBuilder, TreeConfig};
pub use viewport::Viewport;

/// All layout settings in one place; every field has a default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	pub tree: TreeConfig,
	pub rings: RingConfig,
	pub force: ForceConfig,
}

impl LayoutConfig {
	/// Parse a JSON config, falling back to defaults for missing fields.
	pub fn from_json(text: &str) -> serde_json::Result<Self> {
		serde_json::from_str(text)
	}
}

/// Decode two JSONL streams and build the graph. Skipped lines are logged
/// by the decoder and returned alongside the graph.
pub fn load_graph(nodes_text: &str, relationships_text: &str) -> (Graph, Vec<Error>) {
	let nodes = records::parse_nodes(nodes_text);
	let rels = records::parse_relationships(relationships_text);
	let mut skipped = nodes.skipped;
	skipped.extend(rels.skipped);
	(Graph::build(nodes.records, rels.records), skipped)
}

/// Decode a single JSONL stream holding both record kinds and build the
/// graph.
pub fn load_mixed(text: &str) -> (Graph, Vec<Error>) {
	let (nodes, rels) = records::parse_mixed(text);
	let mut skipped = nodes.skipped;
	skipped.extend(rels.skipped);
	(Graph::build(nodes.records, rels.records), skipped)
}
