//! Anchor placement and relationship-typed neighbor rings.
//!
//! Anchors sit evenly on a circle around the origin. Each anchor then
//! spreads its non-anchor neighbors over concentric rings, one ring per
//! relationship-type priority. The first anchor to reach a neighbor keeps
//! it; later anchors skip it. Whatever no anchor claims is left to the
//! force relaxation.

use std::collections::{BTreeMap, HashSet};
use std::f64::consts::{FRAC_PI_2, TAU};

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::graph::{Graph, NodeSelector};

/// Relationship types in ring order, innermost first.
pub const RING_ORDER: [&str; 18] = [
	"DEPENDS_ON",
	"GOVERNS",
	"ROUTES_TO",
	"PROVIDES",
	"HAS_TAG",
	"MEMBER_OF",
	"APPLIES_TO",
	"LOCATED_IN",
	"COVERED_BY",
	"HAS_LOS_TO",
	"EMITS",
	"CAUSAL",
	"OCCURS_AT",
	"RECORDED_AT",
	"PERTAINS_TO",
	"REMEMBERS",
	"CONTAINS",
	"FALLBACKS_TO",
];

/// A background circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ring {
	pub center_x: f64,
	pub center_y: f64,
	pub radius: f64,
}

impl Ring {
	pub fn new(center_x: f64, center_y: f64, radius: f64) -> Self {
		Self {
			center_x,
			center_y,
			radius,
		}
	}
}

/// Settings for [`RingPlacement::place`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
	pub anchors: NodeSelector,
	/// Known relationship types, innermost ring first. Anything else goes
	/// on a ring past the last one.
	pub priority: Vec<String>,
	/// Anchor circle radius as a fraction of the smaller viewport side.
	pub core_radius_ratio: f64,
	pub ring_base: f64,
	pub ring_step: f64,
}

impl Default for RingConfig {
	fn default() -> Self {
		Self {
			anchors: NodeSelector::new("Module").sorted_by("layer"),
			priority: RING_ORDER.iter().map(|t| t.to_string()).collect(),
			core_radius_ratio: 0.28,
			ring_base: 60.0,
			ring_step: 80.0,
		}
	}
}

impl RingConfig {
	/// Ring index for a relationship type; unknown types share the last one.
	pub fn priority_of(&self, rel_type: &str) -> usize {
		self.priority
			.iter()
			.position(|t| t == rel_type)
			.unwrap_or(self.priority.len())
	}

	pub fn core_radius(&self, width: f64, height: f64) -> f64 {
		width.min(height) * self.core_radius_ratio
	}

	/// Distance of ring `priority` from its anchor.
	pub fn ring_radius(&self, priority: usize) -> f64 {
		self.ring_base + priority as f64 * self.ring_step
	}
}

/// Seed positions for anchors and the neighbors they claimed.
#[derive(Clone, Debug, PartialEq)]
pub struct RingPlacement {
	anchors: Vec<usize>,
	is_anchor: Vec<bool>,
	positions: Vec<Option<(f64, f64)>>,
	claimed_by: Vec<Option<usize>>,
	rings: Vec<Ring>,
	core_radius: f64,
}

impl RingPlacement {
	/// Place anchors and ring neighbors for a `width` x `height` viewport
	/// centered on the origin. `rng` supplies one phase per ring.
	pub fn place<R: Rng>(
		graph: &Graph,
		config: &RingConfig,
		width: f64,
		height: f64,
		rng: &mut R,
	) -> Self {
		let anchors = config.anchors.select(graph);
		let core_radius = config.core_radius(width, height);
		let mut placement = Self {
			is_anchor: vec![false; graph.len()],
			positions: vec![None; graph.len()],
			claimed_by: vec![None; graph.len()],
			rings: Vec::new(),
			anchors: Vec::new(),
			core_radius,
		};

		let count = anchors.len() as f64;
		let mut anchor_positions = Vec::with_capacity(anchors.len());
		for (i, &a) in anchors.iter().enumerate() {
			let angle = i as f64 / count * TAU - FRAC_PI_2;
			let pos = (core_radius * angle.cos(), core_radius * angle.sin());
			placement.is_anchor[a] = true;
			placement.positions[a] = Some(pos);
			anchor_positions.push(pos);
		}

		let mut seen = HashSet::new();
		for (&anchor, &(ax, ay)) in anchors.iter().zip(&anchor_positions) {
			let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
			for neighbor in graph.outgoing_at(anchor).chain(graph.incoming_at(anchor)) {
				if placement.is_anchor[neighbor.index] {
					continue;
				}
				groups
					.entry(config.priority_of(&neighbor.relationship.rel_type))
					.or_default()
					.push(neighbor.index);
			}

			for (priority, items) in groups {
				let radius = config.ring_radius(priority);
				let phase = rng.gen_range(0.0..TAU);
				let n = items.len() as f64;
				for (k, &idx) in items.iter().enumerate() {
					if placement.claimed_by[idx].is_some() {
						continue;
					}
					let t = phase + k as f64 / n * TAU;
					placement.positions[idx] = Some((ax + radius * t.cos(), ay + radius * t.sin()));
					placement.claimed_by[idx] = Some(anchor);
				}
				let key = (ax.round() as i64, ay.round() as i64, radius.to_bits());
				if seen.insert(key) {
					placement.rings.push(Ring::new(ax, ay, radius));
				}
			}
		}

		placement.anchors = anchors;
		debug!(
			"ring placement: {} anchors, {} neighbors claimed, {} rings",
			placement.anchors.len(),
			placement.claimed_by.iter().flatten().count(),
			placement.rings.len()
		);
		placement
	}

	/// Anchor indices in circle order.
	pub fn anchors(&self) -> &[usize] {
		&self.anchors
	}

	pub fn is_anchor(&self, idx: usize) -> bool {
		self.is_anchor[idx]
	}

	/// Anchor or ring-claimed: the relaxation must not move it.
	pub fn is_fixed(&self, idx: usize) -> bool {
		self.positions[idx].is_some()
	}

	/// Seeded position of a fixed node; `None` for free ones.
	pub fn position(&self, idx: usize) -> Option<(f64, f64)> {
		self.positions[idx]
	}

	/// The anchor whose ring holds `idx`.
	pub fn claimed_by(&self, idx: usize) -> Option<usize> {
		self.claimed_by[idx]
	}

	/// Rings drawn behind the graph, without duplicates.
	pub fn rings(&self) -> &[Ring] {
		&self.rings
	}

	pub fn core_radius(&self) -> f64 {
		self.core_radius
	}
}
