//! Pan and zoom state, applied by the renderer as one affine transform.

/// Smallest allowed scale.
pub const MIN_SCALE: f64 = 0.2;
/// Largest allowed scale.
pub const MAX_SCALE: f64 = 5.0;

/// `screen = layout * scale + translate`. Never touches node positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub scale: f64,
	pub translate_x: f64,
	pub translate_y: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self {
			scale: 1.0,
			translate_x: 0.0,
			translate_y: 0.0,
		}
	}
}

impl Viewport {
	/// Multiply the scale by `factor` around the cursor, clamped to
	/// `[MIN_SCALE, MAX_SCALE]`. The layout point under the cursor stays
	/// under the cursor. Non-finite or non-positive factors are ignored.
	pub fn zoom(&mut self, cursor_x: f64, cursor_y: f64, factor: f64) {
		if !factor.is_finite() || factor <= 0.0 {
			return;
		}
		let scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
		let k = scale / self.scale;
		self.translate_x = cursor_x - k * (cursor_x - self.translate_x);
		self.translate_y = cursor_y - k * (cursor_y - self.translate_y);
		self.scale = scale;
	}

	/// Shift by a screen-space delta.
	pub fn pan(&mut self, dx: f64, dy: f64) {
		self.translate_x += dx;
		self.translate_y += dy;
	}

	pub fn reset(&mut self) {
		*self = Self::default();
	}

	/// Zoom factor for one wheel notch: in when scrolling up, out when down.
	pub fn wheel_factor(delta_y: f64) -> f64 {
		if delta_y > 0.0 {
			1.0 / 1.1
		} else if delta_y < 0.0 {
			1.1
		} else {
			1.0
		}
	}

	pub fn layout_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
		(
			x * self.scale + self.translate_x,
			y * self.scale + self.translate_y,
		)
	}

	/// Inverse of [`Viewport::layout_to_screen`]. Both work in the centered
	/// frame, not raw canvas pixels.
	pub fn screen_to_layout(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.translate_x) / self.scale,
			(sy - self.translate_y) / self.scale,
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_zoom_stays_in_range() {
		let mut v = Viewport::default();
		for _ in 0..100 {
			v.zoom(13.0, -7.0, 3.0);
			assert!((MIN_SCALE..=MAX_SCALE).contains(&v.scale));
		}
		assert_eq!(v.scale, MAX_SCALE);
		for _ in 0..100 {
			v.zoom(13.0, -7.0, 1e-6);
			assert!((MIN_SCALE..=MAX_SCALE).contains(&v.scale));
		}
		assert_eq!(v.scale, MIN_SCALE);
		for factor in [0.0, -2.0, f64::NAN, f64::INFINITY] {
			let before = v;
			v.zoom(1.0, 1.0, factor);
			assert_eq!(v, before);
		}
	}

	#[test]
	fn test_zoom_keeps_cursor_point() {
		let mut v = Viewport {
			scale: 1.3,
			translate_x: 40.0,
			translate_y: -25.0,
		};
		let (cx, cy) = (120.0, 75.0);
		let anchor = v.screen_to_layout(cx, cy);
		v.zoom(cx, cy, Viewport::wheel_factor(-1.0));
		let (sx, sy) = v.layout_to_screen(anchor.0, anchor.1);
		assert!((sx - cx).abs() < 1e-9 && (sy - cy).abs() < 1e-9);
		assert!((v.scale - 1.43).abs() < 1e-9);
	}

	#[test]
	fn test_pan_and_reset() {
		let mut v = Viewport::default();
		v.zoom(0.0, 0.0, 2.0);
		v.pan(10.0, -4.0);
		v.pan(1.0, 1.0);
		assert_eq!((v.translate_x, v.translate_y, v.scale), (11.0, -3.0, 2.0));
		v.reset();
		assert_eq!(v, Viewport::default());
	}

	#[test]
	fn test_wheel_factor() {
		assert_eq!(Viewport::wheel_factor(0.0), 1.0);
		assert!(Viewport::wheel_factor(120.0) < 1.0);
		assert!(Viewport::wheel_factor(-3.0) > 1.0);
	}
}
