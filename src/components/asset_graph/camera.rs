use log::debug;

use super::surface::{Anchor, RenderSurface, Scene};

pub const MIN_SCALE: f64 = 0.2;
pub const MAX_SCALE: f64 = 4.0;
pub const ZOOM_STEP_PERCENT: u32 = 5;
pub const FIT_PADDING: f64 = 24.0;
pub const PANEL_SHIFT_X: f64 = 140.0;
pub const PANEL_SHIFT_Y: f64 = 80.0;

const WHEEL_ZOOM_IN: f64 = 1.1;
const WHEEL_ZOOM_OUT: f64 = 0.9;

fn percent_of(scale: f64) -> u32 {
	(scale * 100.0).round().max(0.0) as u32
}

/// Zoom and pan bookkeeping for one surface.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraController {
	pub zoom_percent: u32,
	root: Option<String>,
	panel_expanded: Option<bool>,
	fit_padding: f64,
}

impl Default for CameraController {
	fn default() -> Self {
		Self::new(FIT_PADDING)
	}
}

impl CameraController {
	pub fn new(fit_padding: f64) -> Self {
		Self {
			zoom_percent: 100,
			root: None,
			panel_expanded: None,
			fit_padding,
		}
	}

	/// Id of the root cell the panel offset is measured from.
	pub fn set_root(&mut self, root: Option<String>) {
		self.root = root;
	}

	pub fn panel_expanded(&self) -> Option<bool> {
		self.panel_expanded
	}

	pub fn change_zoom<S: RenderSurface>(&mut self, surface: &mut S, multiple: f64) {
		let multiple = multiple.clamp(MIN_SCALE, MAX_SCALE);
		self.zoom_percent = percent_of(multiple);
		surface.zoom_to(multiple);
		if let Some(expanded) = self.panel_expanded {
			self.apply_panel_offset(surface, expanded);
		}
	}

	/// Steps the zoom by `steps` multiples of five percent. The scale never
	/// moves against the sign of `steps`.
	pub fn step_zoom<S: RenderSurface>(&mut self, surface: &mut S, steps: i32) {
		let target = self.zoom_percent as i32 + steps * ZOOM_STEP_PERCENT as i32;
		let target = (f64::from(target) / 100.0).clamp(MIN_SCALE, MAX_SCALE);
		let current = surface.zoom();
		if (steps < 0 && target > current) || (steps > 0 && target < current) {
			return;
		}
		self.change_zoom(surface, target);
	}

	/// Returns the natural fit scale, before the display clamp. The surface is
	/// snapped into `[MIN_SCALE, MAX_SCALE]` with the displayed percent.
	pub fn fit_to_screen<S: RenderSurface>(&mut self, surface: &mut S) -> f64 {
		surface.zoom_to_fit(self.fit_padding);
		let multiple = surface.zoom();
		let step = f64::from(ZOOM_STEP_PERCENT);
		let mut percent = ((multiple * 100.0 / step).round() * step) as u32;
		if percent > percent_of(MAX_SCALE) || multiple > MAX_SCALE {
			percent = percent_of(MAX_SCALE);
			surface.zoom_to(MAX_SCALE);
		} else if percent < percent_of(MIN_SCALE) || multiple < MIN_SCALE {
			percent = percent_of(MIN_SCALE);
			surface.zoom_to(MIN_SCALE);
		}
		self.zoom_percent = percent;
		debug!("fit to screen at {multiple:.3}, showing {percent}%");
		multiple
	}

	pub fn recenter<S: RenderSurface>(&mut self, surface: &mut S) {
		surface.center_content();
	}

	/// No-op while the root cell is absent.
	pub fn on_panel_toggle<S: RenderSurface>(&mut self, surface: &mut S, expanded: bool) {
		if self.apply_panel_offset(surface, expanded) {
			self.panel_expanded = Some(expanded);
		}
	}

	fn apply_panel_offset<S: RenderSurface>(&self, surface: &mut S, expanded: bool) -> bool {
		let Some(root) = self.root.as_deref() else {
			return false;
		};
		if !surface.position_cell(root, Anchor::Top) {
			return false;
		}
		let dx = if expanded { -PANEL_SHIFT_X } else { PANEL_SHIFT_X };
		surface.translate_by(dx, PANEL_SHIFT_Y);
		true
	}

	/// Returns `false` when the wheel event was consumed by snapping to a bound.
	pub fn guard_wheel<S: RenderSurface>(&mut self, surface: &mut S, zoom_in: bool) -> bool {
		let scale = surface.zoom();
		if !zoom_in && scale <= MIN_SCALE {
			surface.zoom_to(MIN_SCALE);
			self.zoom_percent = percent_of(MIN_SCALE);
			return false;
		}
		if zoom_in && scale >= MAX_SCALE {
			surface.zoom_to(MAX_SCALE);
			self.zoom_percent = percent_of(MAX_SCALE);
			return false;
		}
		true
	}

	pub fn sync_from<S: RenderSurface>(&mut self, surface: &S) {
		self.zoom_percent = percent_of(surface.zoom());
	}
}

/// Wheel handling for the canvas [`Scene`]: guard first,
/// then zoom about the cursor.
pub fn on_wheel(
	camera: &mut CameraController,
	scene: &mut Scene,
	delta_y: f64,
	sx: f64,
	sy: f64,
) {
	let zoom_in = delta_y < 0.0;
	if !camera.guard_wheel(scene, zoom_in) {
		return;
	}
	let factor = if zoom_in { WHEEL_ZOOM_IN } else { WHEEL_ZOOM_OUT };
	scene.zoom_at(factor, sx, sy, MIN_SCALE, MAX_SCALE);
	camera.sync_from(&*scene);
}
