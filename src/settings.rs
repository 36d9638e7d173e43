use egui::{Color32, Pos2, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationDirection {
    #[default]
    Clockwise,
    Counterclockwise,
}

impl RotationDirection {
    pub const ALL: [RotationDirection; 2] = [RotationDirection::Clockwise, RotationDirection::Counterclockwise];

    pub fn name(&self) -> &'static str {
        match self {
            RotationDirection::Clockwise => "Clockwise",
            RotationDirection::Counterclockwise => "Counterclockwise",
        }
    }

    /// `+1` for clockwise, `-1` for counterclockwise
    pub fn sign(&self) -> f32 {
        match self {
            RotationDirection::Clockwise => 1.0,
            RotationDirection::Counterclockwise => -1.0,
        }
    }
}

/// Bounds for the canvas radius derived from the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusLimits {
    pub min_radius: f32,
    /// Space kept free between the canvas edge and the viewport edge
    pub margin: f32,
}

impl Default for RadiusLimits {
    fn default() -> Self {
        Self {
            min_radius: 100.0,
            margin: 20.0,
        }
    }
}

impl RadiusLimits {
    /// Largest radius that fits `viewport`, never below one unit
    pub fn max_radius(&self, viewport: Vec2) -> f32 {
        (viewport.x.min(viewport.y) / 2.0 - self.margin).max(1.0)
    }

    /// Clamp `radius` into `[min_radius, max_radius]`; the max wins if they cross
    pub fn clamp(&self, radius: f32, viewport: Vec2) -> f32 {
        let max = self.max_radius(viewport);
        let min = self.min_radius.min(max);
        if radius.is_finite() { radius.clamp(min, max) } else { max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSettings {
    pub background_color: Color32,
    /// Degrees per second, never negative; the direction carries the sign
    pub rotation_speed: f32,
    pub rotation_direction: RotationDirection,
    pub rotation_center: Pos2,
    pub radius: f32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        let radius = 300.0;
        Self {
            background_color: Color32::WHITE,
            rotation_speed: 5.0,
            rotation_direction: RotationDirection::Clockwise,
            rotation_center: Pos2::new(radius, radius),
            radius,
        }
    }
}

impl CanvasSettings {
    /// Rotation speed with the direction's sign applied
    pub fn signed_speed(&self) -> f32 {
        self.rotation_speed * self.rotation_direction.sign()
    }

    /// The square canvas is exactly one diameter wide
    pub fn canvas_size(&self) -> Vec2 {
        Vec2::splat(self.radius * 2.0)
    }

    /// Pixel dimensions of the canvas, as used for rendering and export
    pub fn pixel_size(&self) -> (u32, u32) {
        let side = (self.radius * 2.0).round().max(0.0) as u32;
        (side, side)
    }

    pub fn geometric_center(&self) -> Pos2 {
        Pos2::new(self.radius, self.radius)
    }

    /// Put the rotation center back on the canvas' geometric center
    pub fn reset_rotation_center(&mut self) -> bool {
        let center = self.geometric_center();
        let changed = self.rotation_center != center;
        self.rotation_center = center;
        changed
    }

    /// Fit the canvas to a new viewport: maximal radius, centered pivot
    pub fn fit_viewport(&mut self, viewport: Vec2, limits: &RadiusLimits) -> bool {
        let before = *self;
        self.radius = limits.max_radius(viewport);
        self.reset_rotation_center();
        *self != before
    }

    /// Merge a partial update. The radius is clamped against the viewport in the
    /// same step, and the center follows the radius.
    ///
    /// Without a known viewport only an explicit radius is checked, against the
    /// minimum; the current radius is left alone.
    pub fn apply(&mut self, update: &SettingsUpdate, viewport: Option<Vec2>, limits: &RadiusLimits) -> bool {
        let before = *self;
        if let Some(color) = update.background_color {
            self.background_color = color;
        }
        if let Some(speed) = update.rotation_speed {
            self.rotation_speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
        }
        if let Some(direction) = update.rotation_direction {
            self.rotation_direction = direction;
        }
        match (viewport, update.radius) {
            (Some(viewport), radius) => {
                self.radius = limits.clamp(radius.unwrap_or(self.radius), viewport);
            }
            (None, Some(radius)) if radius.is_finite() => {
                self.radius = radius.max(limits.min_radius);
            }
            (None, _) => {}
        }
        if self.radius != before.radius {
            self.reset_rotation_center();
        }
        *self != before
    }
}

/// Partial settings update, see [`CanvasSettings::apply`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SettingsUpdate {
    pub background_color: Option<Color32>,
    pub rotation_speed: Option<f32>,
    pub rotation_direction: Option<RotationDirection>,
    pub radius: Option<f32>,
}
