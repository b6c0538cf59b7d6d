//! Containment forest derived from one relationship type.
//!
//! Tree nodes live in an arena. A node's `parent` is a plain index used for
//! upward traversal only; ownership flows through `children`. Nodes are
//! pushed in depth-first pre-order, so every parent index is smaller than
//! the indices of its children.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::error::{Error, Result};
use super::graph::{Graph, NodeSelector};

/// Arena index of a [`TreeNode`].
pub type TreeIdx = usize;

/// Index of the synthetic apex.
pub const ROOT: TreeIdx = 0;

/// One entry of the forest plus its radial layout annotations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeNode {
	/// Backing graph node; `None` only for the synthetic root.
	pub node: Option<usize>,
	pub parent: Option<TreeIdx>,
	pub children: Vec<TreeIdx>,
	pub depth: usize,
	pub leaf_count: usize,
	pub angle_start: f64,
	pub angle_end: f64,
	/// Midpoint of the angular span.
	pub angle: f64,
	pub x: f64,
	pub y: f64,
}

impl TreeNode {
	pub fn is_leaf(&self) -> bool {
		self.children.is_empty()
	}

	pub fn span(&self) -> f64 {
		self.angle_end - self.angle_start
	}
}

/// A single tree whose apex wraps every top-level root.
#[derive(Clone, Debug, PartialEq)]
pub struct ContainmentTree {
	nodes: Vec<TreeNode>,
}

impl Default for ContainmentTree {
	fn default() -> Self {
		Self::empty()
	}
}

impl ContainmentTree {
	/// A forest with no roots: just the synthetic apex.
	pub fn empty() -> Self {
		Self {
			nodes: vec![TreeNode::default()],
		}
	}

	fn push(&mut self, node: usize, parent: TreeIdx) -> TreeIdx {
		let idx = self.nodes.len();
		self.nodes.push(TreeNode {
			node: Some(node),
			parent: Some(parent),
			..TreeNode::default()
		});
		self.nodes[parent].children.push(idx);
		idx
	}

	pub fn nodes(&self) -> &[TreeNode] {
		&self.nodes
	}

	pub(crate) fn nodes_mut(&mut self) -> &mut [TreeNode] {
		&mut self.nodes
	}

	pub fn get(&self, idx: TreeIdx) -> &TreeNode {
		&self.nodes[idx]
	}

	/// Top-level roots, in selection order.
	pub fn roots(&self) -> &[TreeIdx] {
		&self.nodes[ROOT].children
	}

	/// Number of tree nodes, including the synthetic root.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// True when no root candidate was found.
	pub fn is_empty(&self) -> bool {
		self.roots().is_empty()
	}

	/// Tree index holding graph node `node`, if it was reached.
	pub fn find(&self, node: usize) -> Option<TreeIdx> {
		self.nodes.iter().position(|t| t.node == Some(node))
	}

	/// Walk from `idx` up to the synthetic root, excluding `idx` itself.
	pub fn ancestors(&self, idx: TreeIdx) -> impl Iterator<Item = TreeIdx> + '_ {
		std::iter::successors(self.nodes[idx].parent, move |&p| self.nodes[p].parent)
	}

	/// Parent/child pairs in pre-order.
	pub fn edges(&self) -> impl Iterator<Item = (TreeIdx, TreeIdx)> + '_ {
		self.nodes
			.iter()
			.enumerate()
			.skip(1)
			.filter_map(|(idx, t)| t.parent.map(|p| (p, idx)))
	}
}

/// Settings for deriving the forest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
	/// Picks and orders the top-level roots.
	pub roots: NodeSelector,
	/// Only outgoing relationships of this type are followed.
	pub containment: String,
	/// Gap between the outermost ring and the viewport edge.
	pub margin: f64,
}

impl Default for TreeConfig {
	fn default() -> Self {
		Self {
			roots: NodeSelector::new("Layer"),
			containment: "CONTAINS".to_string(),
			margin: 40.0,
		}
	}
}

struct Frame {
	tree: TreeIdx,
	children: Vec<usize>,
	next: usize,
}

/// Builds a [`ContainmentTree`] from a graph.
#[derive(Clone, Debug, Default)]
pub struct ContainmentTreeBuilder {
	config: TreeConfig,
}

impl ContainmentTreeBuilder {
	pub fn new(config: TreeConfig) -> Self {
		Self { config }
	}

	/// Like [`build`](Self::build), but reports a forest without roots.
	pub fn try_build(&self, graph: &Graph) -> Result<ContainmentTree> {
		let tree = self.build(graph);
		if tree.is_empty() {
			return Err(Error::EmptyGraph {
				label: self.config.roots.label.clone(),
			});
		}
		Ok(tree)
	}

	/// Depth-first from each root over containment relationships. A node
	/// already attached anywhere in the forest is never attached again, so
	/// shared children go to the first parent that reaches them and cycles
	/// end where they close.
	pub fn build(&self, graph: &Graph) -> ContainmentTree {
		let mut tree = ContainmentTree::empty();
		let mut visited = vec![false; graph.len()];
		let mut stack: Vec<Frame> = Vec::new();

		for root in self.config.roots.select(graph) {
			if visited[root] {
				continue;
			}
			visited[root] = true;
			let idx = tree.push(root, ROOT);
			stack.push(self.frame(graph, idx, root));

			while let Some(frame) = stack.last_mut() {
				let Some(&child) = frame.children.get(frame.next) else {
					stack.pop();
					continue;
				};
				frame.next += 1;
				if visited[child] {
					continue;
				}
				visited[child] = true;
				let idx = tree.push(child, frame.tree);
				stack.push(self.frame(graph, idx, child));
			}
		}

		if tree.is_empty() {
			warn!("no {} nodes to root the containment tree", self.config.roots.label);
		} else {
			debug!(
				"containment tree: {} roots, {} nodes",
				tree.roots().len(),
				tree.len() - 1
			);
		}
		tree
	}

	fn frame(&self, graph: &Graph, tree: TreeIdx, node: usize) -> Frame {
		let children = graph
			.outgoing_at(node)
			.filter(|n| n.relationship.rel_type == self.config.containment)
			.map(|n| n.index)
			.collect();
		Frame {
			tree,
			children,
			next: 0,
		}
	}
}
