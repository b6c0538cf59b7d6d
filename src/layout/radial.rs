//! Radial layout of a containment tree.
//!
//! Every node gets an angular span proportional to its leaf count and sits
//! at the middle of that span, on the ring for its depth.

use std::f64::consts::{FRAC_PI_2, TAU};

use log::debug;

use super::rings::Ring;
use super::tree::{ContainmentTree, ROOT};

/// Inputs for [`annotate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialOptions {
	pub width: f64,
	pub height: f64,
	pub margin: f64,
	pub span_start: f64,
	pub span_end: f64,
}

impl RadialOptions {
	/// Full circle over a viewport of the given size.
	pub fn new(width: f64, height: f64, margin: f64) -> Self {
		Self {
			width,
			height,
			margin,
			span_start: 0.0,
			span_end: TAU,
		}
	}
}

/// What [`annotate`] computed besides the per-node fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialSummary {
	pub max_depth: usize,
	pub ring_step: f64,
}

impl RadialSummary {
	/// One background ring per non-zero depth, centered on the origin.
	pub fn depth_rings(&self) -> Vec<Ring> {
		(1..=self.max_depth)
			.map(|d| Ring::new(0.0, 0.0, d as f64 * self.ring_step))
			.collect()
	}
}

/// Annotate depth, leaf count, angles and positions in place.
pub fn annotate(tree: &mut ContainmentTree, options: &RadialOptions) -> RadialSummary {
	let max_depth = annotate_depth(tree);
	count_leaves(tree);
	assign_angles(tree, options.span_start, options.span_end);
	let ring_step = ring_step(options, max_depth);
	assign_positions(tree, ring_step);
	debug!("radial layout: max depth {max_depth}, ring step {ring_step:.1}");
	RadialSummary {
		max_depth,
		ring_step,
	}
}

/// Distance between consecutive depth rings.
pub fn ring_step(options: &RadialOptions, max_depth: usize) -> f64 {
	let available = (options.width.min(options.height) / 2.0 - options.margin).max(0.0);
	available / max_depth.max(1) as f64
}

/// Root depth 0, children one deeper than their parent. Returns max depth.
pub fn annotate_depth(tree: &mut ContainmentTree) -> usize {
	let nodes = tree.nodes_mut();
	let mut max_depth = 0;
	nodes[ROOT].depth = 0;
	for idx in 1..nodes.len() {
		if let Some(parent) = nodes[idx].parent {
			let depth = nodes[parent].depth + 1;
			nodes[idx].depth = depth;
			max_depth = max_depth.max(depth);
		}
	}
	max_depth
}

/// Leaves count 1, inner nodes the sum over their children. Returns the
/// root's count.
pub fn count_leaves(tree: &mut ContainmentTree) -> usize {
	let nodes = tree.nodes_mut();
	for idx in (0..nodes.len()).rev() {
		if nodes[idx].is_leaf() {
			nodes[idx].leaf_count = 1;
		} else {
			let sum: usize = nodes[idx].children.iter().map(|&c| nodes[c].leaf_count).sum();
			nodes[idx].leaf_count = sum;
		}
	}
	nodes[ROOT].leaf_count
}

/// Give the root `[start, end)` and split every span across children by
/// leaf count, in child order. Leaf counts must already be set.
pub fn assign_angles(tree: &mut ContainmentTree, start: f64, end: f64) {
	let nodes = tree.nodes_mut();
	nodes[ROOT].angle_start = start;
	nodes[ROOT].angle_end = end;
	for idx in 0..nodes.len() {
		let (start, end) = (nodes[idx].angle_start, nodes[idx].angle_end);
		nodes[idx].angle = (start + end) / 2.0;
		let total = nodes[idx].leaf_count as f64;
		let mut acc = start;
		for k in 0..nodes[idx].children.len() {
			let child = nodes[idx].children[k];
			let span = (end - start) * (nodes[child].leaf_count as f64 / total);
			nodes[child].angle_start = acc;
			acc += span;
			nodes[child].angle_end = acc;
		}
		if let Some(&last) = nodes[idx].children.last() {
			// Close the span exactly so rounding never leaves a sliver.
			nodes[last].angle_end = end;
		}
	}
}

/// Place each node on its depth ring. The quarter-turn offset puts angle 0
/// at the top.
pub fn assign_positions(tree: &mut ContainmentTree, ring_step: f64) {
	for node in tree.nodes_mut() {
		let radius = node.depth as f64 * ring_step;
		let theta = node.angle - FRAC_PI_2;
		node.x = radius * theta.cos();
		node.y = radius * theta.sin();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::layout::graph::{Graph, Node, Relationship};
	use crate::layout::tree::{ContainmentTreeBuilder, TreeIdx};

	const EPS: f64 = 1e-9;

	fn wide_tree() -> ContainmentTree {
		let g = Graph::build(
			vec![
				Node::new("L1", &["Layer"]),
				Node::new("L2", &["Layer"]),
				Node::new("a", &[]),
				Node::new("b", &[]),
				Node::new("c", &[]),
				Node::new("d", &[]),
			],
			vec![
				Relationship::new("L1", "a", "CONTAINS"),
				Relationship::new("a", "b", "CONTAINS"),
				Relationship::new("a", "c", "CONTAINS"),
				Relationship::new("L1", "d", "CONTAINS"),
			],
		);
		ContainmentTreeBuilder::default().build(&g)
	}

	#[test]
	fn test_depth_and_leaves() {
		let mut tree = wide_tree();
		let summary = annotate(&mut tree, &RadialOptions::new(800.0, 600.0, 40.0));
		assert_eq!(summary.max_depth, 3);
		// Leaves: b, c, d under L1 and L2 on its own.
		assert_eq!(tree.get(ROOT).leaf_count, 4);
		let l1 = tree.roots()[0];
		assert_eq!(tree.get(l1).leaf_count, 3);
		let reachable_leaves = tree.nodes().iter().filter(|t| t.is_leaf()).count();
		assert_eq!(reachable_leaves, 4);
	}

	#[test]
	fn test_child_spans_partition_parent() {
		let mut tree = wide_tree();
		annotate(&mut tree, &RadialOptions::new(800.0, 600.0, 40.0));
		for node in tree.nodes() {
			if node.is_leaf() {
				continue;
			}
			let mut cursor = node.angle_start;
			let mut total = 0.0;
			for &c in &node.children {
				let child = tree.get(c);
				assert!((child.angle_start - cursor).abs() < EPS);
				assert!(child.span() > 0.0);
				cursor = child.angle_end;
				total += child.span();
			}
			assert!((cursor - node.angle_end).abs() < EPS);
			assert!((total - node.span()).abs() < EPS);
		}
		assert!((tree.get(ROOT).span() - TAU).abs() < EPS);
	}

	#[test]
	fn test_radius_grows_with_depth() {
		let mut tree = wide_tree();
		let summary = annotate(&mut tree, &RadialOptions::new(800.0, 600.0, 40.0));
		assert!((summary.ring_step - (300.0 - 40.0) / 3.0).abs() < EPS);

		let radius = |t: TreeIdx| tree.get(t).x.hypot(tree.get(t).y);
		assert!(radius(ROOT).abs() < EPS);
		for (parent, child) in tree.edges() {
			assert!(radius(child) >= radius(parent) - EPS);
			let expected = tree.get(child).depth as f64 * summary.ring_step;
			assert!((radius(child) - expected).abs() < 1e-6);
		}

		let rings = summary.depth_rings();
		assert_eq!(rings.len(), 3);
		assert!(rings.windows(2).all(|w| w[0].radius < w[1].radius));
	}

	#[test]
	fn test_single_root_sits_opposite_the_top() {
		let g = Graph::build(vec![Node::new("L", &["Layer"])], vec![]);
		let mut tree = ContainmentTreeBuilder::default().build(&g);
		let summary = annotate(&mut tree, &RadialOptions::new(200.0, 200.0, 0.0));
		let l = tree.get(tree.roots()[0]);
		// A lone child spans the full circle; its midpoint is π, i.e. the bottom.
		assert!((l.angle - std::f64::consts::PI).abs() < EPS);
		assert!((l.y - summary.ring_step).abs() < 1e-6);
		assert!(l.x.abs() < 1e-6);
	}

	#[test]
	fn test_empty_forest_and_tiny_viewport() {
		let mut tree = ContainmentTree::empty();
		let summary = annotate(&mut tree, &RadialOptions::new(10.0, 10.0, 40.0));
		assert_eq!(summary.max_depth, 0);
		assert_eq!(summary.ring_step, 0.0);
		assert_eq!(tree.get(ROOT).leaf_count, 1);
		assert!(summary.depth_rings().is_empty());
	}
}
