//! Tick-based force relaxation.
//!
//! Three forces act on every particle: pairwise repulsion, springs along
//! relationships with a per-type rest length, and a weak pull of the whole
//! system's centroid toward the center.
//! Fixed particles push and pull like any other but are never integrated.
//! `alpha` scales the forces and decays every tick; the run stops once it
//! drops below `alpha_min` or the tick budget is spent.
//!
//! [`step`] is a pure function of the particles and `alpha`, so single ticks
//! can be checked without any scheduling loop.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// A point mass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Held in place for the whole run.
	pub fixed: bool,
}

impl Particle {
	/// A movable particle at rest.
	pub fn free(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			..Self::default()
		}
	}

	/// A particle that never moves.
	pub fn fixed(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			fixed: true,
			..Self::default()
		}
	}
}

/// Start position for the `i`-th free particle: a sunflower spiral around
/// the origin, so no two particles start on top of each other.
pub fn phyllotaxis(i: usize) -> (f64, f64) {
	let radius = 10.0 * (0.5 + i as f64).sqrt();
	let angle = i as f64 * PI * (3.0 - 5f64.sqrt());
	(radius * angle.cos(), radius * angle.sin())
}

/// A spring between two particles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
	/// Particle indices.
	pub source: usize,
	pub target: usize,
	/// Rest length.
	pub length: f64,
}

/// Simulation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
	/// Many-body strength; negative repels.
	pub charge: f64,
	/// Pairs closer than this are treated as this far apart.
	pub distance_min: f64,
	/// Pull on free particles toward the center, per unit of centroid
	/// offset. The centroid includes fixed particles.
	pub center_strength: f64,
	pub center_x: f64,
	pub center_y: f64,
	/// Spring stiffness; the displacement is split between endpoints by degree.
	pub spring_strength: f64,
	/// Rest length per relationship type.
	pub spring_lengths: BTreeMap<String, f64>,
	pub default_length: f64,
	/// Rest length between two anchors, as a fraction of the anchor circle
	/// radius.
	pub anchor_length_ratio: f64,
	pub alpha_start: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	pub alpha_target: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Tick budget; a run that hits it ends as `BudgetExhausted`.
	pub max_ticks: usize,
}

impl Default for ForceConfig {
	fn default() -> Self {
		let spring_lengths = [
			("DEPENDS_ON", 90.0),
			("GOVERNS", 120.0),
			("ROUTES_TO", 140.0),
			("PROVIDES", 110.0),
			("HAS_TAG", 90.0),
			("MEMBER_OF", 90.0),
		]
		.into_iter()
		.map(|(t, l)| (t.to_string(), l))
		.collect();

		Self {
			charge: -150.0,
			distance_min: 1.0,
			center_strength: 0.01,
			center_x: 0.0,
			center_y: 0.0,
			spring_strength: 0.2,
			spring_lengths,
			default_length: 130.0,
			anchor_length_ratio: 0.75,
			alpha_start: 1.0,
			alpha_min: 0.001,
			alpha_decay: 0.05,
			alpha_target: 0.0,
			velocity_decay: 0.4,
			max_ticks: 300,
		}
	}
}

impl ForceConfig {
	/// Rest length for a relationship of `rel_type`.
	pub fn spring_length(&self, rel_type: &str, between_anchors: bool, core_radius: f64) -> f64 {
		if between_anchors {
			return core_radius * self.anchor_length_ratio;
		}
		self.spring_lengths
			.get(rel_type)
			.copied()
			.unwrap_or(self.default_length)
	}

	fn next_alpha(&self, alpha: f64) -> f64 {
		alpha + (self.alpha_target - alpha) * self.alpha_decay
	}
}

/// `alpha` after `ticks` ticks from a fresh start.
pub fn alpha_after(config: &ForceConfig, ticks: usize) -> f64 {
	(0..ticks).fold(config.alpha_start, |alpha, _| config.next_alpha(alpha))
}

/// One tick: forces at `alpha`, then integration. Returns the next state
/// and leaves `particles` untouched.
pub fn step(particles: &[Particle], springs: &[Spring], config: &ForceConfig, alpha: f64) -> Vec<Particle> {
	let mut next = particles.to_vec();
	apply_springs(&mut next, springs, config, alpha);
	apply_charge(&mut next, config, alpha);
	apply_centering(&mut next, config, alpha);
	integrate(&mut next, config);
	next
}

fn jiggle(i: usize, j: usize) -> f64 {
	1e-6 * (i as f64 - j as f64)
}

fn apply_springs(particles: &mut [Particle], springs: &[Spring], config: &ForceConfig, alpha: f64) {
	let mut degree = vec![0usize; particles.len()];
	for s in springs {
		degree[s.source] += 1;
		degree[s.target] += 1;
	}

	for s in springs {
		if s.source == s.target {
			continue;
		}
		let (src, tgt) = (particles[s.source], particles[s.target]);
		let mut dx = tgt.x + tgt.vx - src.x - src.vx;
		let mut dy = tgt.y + tgt.vy - src.y - src.vy;
		if dx == 0.0 && dy == 0.0 {
			dx = jiggle(s.target, s.source);
			dy = dx;
		}
		let l = dx.hypot(dy);
		let f = (l - s.length) / l * alpha * config.spring_strength;
		dx *= f;
		dy *= f;

		// The busier endpoint moves less.
		let bias = degree[s.source] as f64 / (degree[s.source] + degree[s.target]) as f64;
		particles[s.target].vx -= dx * bias;
		particles[s.target].vy -= dy * bias;
		particles[s.source].vx += dx * (1.0 - bias);
		particles[s.source].vy += dy * (1.0 - bias);
	}
}

fn apply_charge(particles: &mut [Particle], config: &ForceConfig, alpha: f64) {
	let min2 = config.distance_min * config.distance_min;
	for i in 0..particles.len() {
		for j in (i + 1)..particles.len() {
			let mut dx = particles[j].x - particles[i].x;
			let mut dy = particles[j].y - particles[i].y;
			if dx == 0.0 && dy == 0.0 {
				dx = jiggle(j, i);
				dy = dx;
			}
			let mut l2 = dx * dx + dy * dy;
			if l2 < min2 {
				l2 = (min2 * l2).sqrt();
			}
			let w = config.charge * alpha / l2;
			particles[i].vx += dx * w;
			particles[i].vy += dy * w;
			particles[j].vx -= dx * w;
			particles[j].vy -= dy * w;
		}
	}
}

fn integrate(particles: &mut [Particle], config: &ForceConfig) {
	let keep = 1.0 - config.velocity_decay;
	for p in particles.iter_mut() {
		if p.fixed {
			p.vx = 0.0;
			p.vy = 0.0;
			continue;
		}
		p.vx *= keep;
		p.vy *= keep;
		p.x += p.vx;
		p.y += p.vy;
	}
}

fn apply_centering(particles: &mut [Particle], config: &ForceConfig, alpha: f64) {
	if particles.is_empty() {
		return;
	}
	let n = particles.len() as f64;
	let mean_x = particles.iter().map(|p| p.x).sum::<f64>() / n;
	let mean_y = particles.iter().map(|p| p.y).sum::<f64>() / n;
	let k = config.center_strength * alpha;
	let (pull_x, pull_y) = ((config.center_x - mean_x) * k, (config.center_y - mean_y) * k);
	for p in particles.iter_mut().filter(|p| !p.fixed) {
		p.vx += pull_x;
		p.vy += pull_y;
	}
}

/// Where a relaxation run stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelaxStatus {
	Running,
	/// `alpha` fell below `alpha_min`.
	Converged,
	/// Tick budget spent first; positions are best effort.
	BudgetExhausted,
}

/// An in-flight simulation, advanced one tick at a time by its owner.
#[derive(Clone, Debug)]
pub struct Relaxation {
	particles: Vec<Particle>,
	springs: Vec<Spring>,
	config: ForceConfig,
	alpha: f64,
	ticks: usize,
	status: RelaxStatus,
}

impl Relaxation {
	/// Start a run at `config.alpha_start`.
	pub fn new(particles: Vec<Particle>, springs: Vec<Spring>, config: ForceConfig) -> Self {
		Self {
			alpha: config.alpha_start,
			particles,
			springs,
			config,
			ticks: 0,
			status: RelaxStatus::Running,
		}
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	pub fn springs(&self) -> &[Spring] {
		&self.springs
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Ticks taken so far.
	pub fn ticks(&self) -> usize {
		self.ticks
	}

	pub fn status(&self) -> RelaxStatus {
		self.status
	}

	pub fn is_running(&self) -> bool {
		self.status == RelaxStatus::Running
	}

	/// Advance one tick. Does nothing once the run has finished.
	pub fn tick(&mut self) -> RelaxStatus {
		if !self.is_running() {
			return self.status;
		}
		self.alpha = self.config.next_alpha(self.alpha);
		self.particles = step(&self.particles, &self.springs, &self.config, self.alpha);
		self.ticks += 1;

		if self.alpha < self.config.alpha_min {
			self.status = RelaxStatus::Converged;
		} else if self.ticks >= self.config.max_ticks {
			self.status = RelaxStatus::BudgetExhausted;
		}
		self.status
	}

	/// Tick until the run finishes.
	pub fn run(&mut self) -> RelaxStatus {
		while self.is_running() {
			self.tick();
		}
		self.status
	}
}
