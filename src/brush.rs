use egui::Color32;
use serde::{Deserialize, Serialize};

/// The three brush styles a stroke can be drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushType {
    #[default]
    Pen,
    Pencil,
    Brush,
}

impl BrushType {
    pub const ALL: [BrushType; 3] = [BrushType::Pen, BrushType::Pencil, BrushType::Brush];

    pub fn name(&self) -> &'static str {
        match self {
            BrushType::Pen => "Pen",
            BrushType::Pencil => "Pencil",
            BrushType::Brush => "Brush",
        }
    }

    /// Multipliers applied to the brush size and opacity when stroking a line
    fn line_factors(&self) -> (f32, f32) {
        match self {
            BrushType::Pen => (1.0, 1.0),
            BrushType::Pencil => (0.8, 0.9),
            BrushType::Brush => (1.5, 0.7),
        }
    }

    /// Whether per-point pressure modulates the line width
    pub fn uses_pressure(&self) -> bool {
        matches!(self, BrushType::Brush)
    }
}

/// Brush settings. Copied by value into every stroke when it starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub brush_type: BrushType,
    pub color: Color32,
    pub size: f32,
    pub opacity: f32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            brush_type: BrushType::Pen,
            color: Color32::BLACK,
            size: 5.0,
            opacity: 1.0,
        }
    }
}

impl Brush {
    pub const MIN_SIZE: f32 = 0.1;

    /// Line width used between two points, `pressure` being the later point's pressure
    pub fn line_width(&self, pressure: f32) -> f32 {
        let (width_factor, _) = self.brush_type.line_factors();
        if self.brush_type.uses_pressure() {
            self.size * pressure * width_factor
        } else {
            self.size * width_factor
        }
    }

    /// Alpha used for multi-point strokes
    pub fn line_opacity(&self) -> f32 {
        let (_, alpha_factor) = self.brush_type.line_factors();
        self.opacity * alpha_factor
    }

    /// Merge a partial update; unspecified fields keep their values
    pub fn apply(&mut self, update: &BrushUpdate) -> bool {
        let before = *self;
        if let Some(brush_type) = update.brush_type {
            self.brush_type = brush_type;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(size) = update.size {
            self.size = size.max(Self::MIN_SIZE);
        }
        if let Some(opacity) = update.opacity {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
        *self != before
    }
}

/// Partial brush update, see [`Brush::apply`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BrushUpdate {
    pub brush_type: Option<BrushType>,
    pub color: Option<Color32>,
    pub size: Option<f32>,
    pub opacity: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_styles_per_type() {
        let mut brush = Brush {
            brush_type: BrushType::Pen,
            color: Color32::BLACK,
            size: 10.0,
            opacity: 1.0,
        };
        assert_eq!(brush.line_width(0.5), 10.0);
        assert_eq!(brush.line_opacity(), 1.0);

        brush.brush_type = BrushType::Pencil;
        assert!((brush.line_width(0.5) - 8.0).abs() < 1e-5);
        assert!((brush.line_opacity() - 0.9).abs() < 1e-5);

        brush.brush_type = BrushType::Brush;
        assert!((brush.line_width(1.0) - 15.0).abs() < 1e-5);
        assert!((brush.line_width(0.5) - 7.5).abs() < 1e-5);
        assert!((brush.line_opacity() - 0.7).abs() < 1e-5);
    }

    #[test]
    fn test_partial_update() {
        let mut brush = Brush::default();
        let changed = brush.apply(&BrushUpdate {
            size: Some(12.0),
            ..Default::default()
        });
        assert!(changed);
        assert_eq!(brush.size, 12.0);
        assert_eq!(brush.color, Color32::BLACK);
        assert_eq!(brush.brush_type, BrushType::Pen);

        assert!(!brush.apply(&BrushUpdate::default()));
    }

    #[test]
    fn test_update_clamps_values() {
        let mut brush = Brush::default();
        brush.apply(&BrushUpdate {
            size: Some(-3.0),
            opacity: Some(2.0),
            ..Default::default()
        });
        assert_eq!(brush.size, Brush::MIN_SIZE);
        assert_eq!(brush.opacity, 1.0);
    }
}
