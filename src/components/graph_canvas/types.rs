use crate::layout::NodeKind;

/// Which layout the canvas shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ViewMode {
	/// Radial containment tree.
	#[default]
	Tree,
	/// Anchors, typed rings and force relaxation.
	Module,
}

impl ViewMode {
	/// Both modes, in selector order.
	pub const ALL: [ViewMode; 2] = [ViewMode::Tree, ViewMode::Module];

	/// Button text.
	pub fn label(self) -> &'static str {
		match self {
			ViewMode::Tree => "Containment tree",
			ViewMode::Module => "Module rings",
		}
	}

	/// Node families that can appear in this view, in legend order.
	pub fn legend(self) -> &'static [NodeKind] {
		match self {
			ViewMode::Tree => &[NodeKind::Root, NodeKind::Layer, NodeKind::Module],
			ViewMode::Module => &[
				NodeKind::Layer,
				NodeKind::Module,
				NodeKind::Policy,
				NodeKind::Service,
				NodeKind::Taxonomy,
				NodeKind::Data,
				NodeKind::Event,
				NodeKind::Other,
			],
		}
	}
}

/// Fill color for a node family.
pub fn kind_color(kind: NodeKind) -> &'static str {
	match kind {
		NodeKind::Root => "#7f7f7f",
		NodeKind::Layer => "#ff7f0e",
		NodeKind::Module => "#1f77b4",
		NodeKind::Policy => "#d62728",
		NodeKind::Service => "#2ca02c",
		NodeKind::Taxonomy => "#9467bd",
		NodeKind::Data => "#17becf",
		NodeKind::Event => "#bcbd22",
		NodeKind::Other => "#6b7280",
	}
}

/// Legend text for a node family.
pub fn kind_label(kind: NodeKind) -> &'static str {
	match kind {
		NodeKind::Root => "Virtual root",
		NodeKind::Layer => "Layer",
		NodeKind::Module => "Module",
		NodeKind::Policy => "Policy",
		NodeKind::Service => "Service / channel / endpoint",
		NodeKind::Taxonomy => "Tag / group",
		NodeKind::Data => "Data",
		NodeKind::Event => "Event",
		NodeKind::Other => "Other",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	#[test]
	fn test_legend_colors_are_distinct() {
		for mode in ViewMode::ALL {
			let colors: HashSet<_> = mode.legend().iter().map(|&k| kind_color(k)).collect();
			assert_eq!(colors.len(), mode.legend().len());
		}
		assert_eq!(ViewMode::Tree.legend()[0], NodeKind::Root);
		assert!(!ViewMode::Module.legend().contains(&NodeKind::Root));
	}
}
