use egui::Pos2;
use std::sync::Arc;

use crate::brush::Brush;

/// One sampled pointer position in canvas space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingPoint {
    pub pos: Pos2,
    /// 0..=1, 1 when the device reports nothing
    pub pressure: f32,
    /// Capture time in milliseconds on a monotonic clock
    pub time: f64,
}

impl DrawingPoint {
    pub fn new(pos: Pos2, pressure: f32, time: f64) -> Self {
        Self {
            pos,
            pressure: pressure.clamp(0.0, 1.0),
            time,
        }
    }
}

// Immutable stroke for sharing
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<DrawingPoint>,
    brush: Brush,
}

// Stroke under construction
#[derive(Debug, Clone)]
pub struct MutableStroke {
    points: Vec<DrawingPoint>,
    brush: Brush,
}

// Committed strokes are shared between history snapshots and the renderer
pub type StrokeRef = Arc<Stroke>;

impl Stroke {
    pub fn new(brush: Brush, points: Vec<DrawingPoint>) -> Self {
        Self { points, brush }
    }

    pub fn new_ref(brush: Brush, points: Vec<DrawingPoint>) -> StrokeRef {
        Arc::new(Self::new(brush, points))
    }

    pub fn points(&self) -> &[DrawingPoint] {
        &self.points
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// A tap without drag
    pub fn is_dot(&self) -> bool {
        self.points.len() == 1
    }
}

impl MutableStroke {
    // A stroke always starts with its first sample, so it is never empty
    pub fn new(brush: Brush, first: DrawingPoint) -> Self {
        Self {
            points: vec![first],
            brush,
        }
    }

    pub fn add_point(&mut self, point: DrawingPoint) {
        // keep capture times monotonic within the stroke
        let time = self
            .points
            .last()
            .map_or(point.time, |last| point.time.max(last.time));
        self.points.push(DrawingPoint { time, ..point });
    }

    // Freeze into a shareable stroke
    pub fn into_stroke_ref(self) -> StrokeRef {
        Arc::new(Stroke::new(self.brush, self.points))
    }

    // Preview copy for rendering while drawing
    pub fn to_stroke(&self) -> Stroke {
        Stroke::new(self.brush, self.points.clone())
    }

    pub fn points(&self) -> &[DrawingPoint] {
        &self.points
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutable_stroke_starts_with_one_point() {
        let stroke = MutableStroke::new(Brush::default(), DrawingPoint::new(Pos2::new(1.0, 2.0), 1.0, 0.0));
        assert_eq!(stroke.points().len(), 1);
        assert!(stroke.to_stroke().is_dot());
    }

    #[test]
    fn test_times_stay_monotonic() {
        let mut stroke = MutableStroke::new(Brush::default(), DrawingPoint::new(Pos2::ZERO, 1.0, 10.0));
        stroke.add_point(DrawingPoint::new(Pos2::new(1.0, 1.0), 1.0, 5.0));
        assert_eq!(stroke.points()[1].time, 10.0);
    }

    #[test]
    fn test_pressure_is_clamped() {
        let point = DrawingPoint::new(Pos2::ZERO, 3.0, 0.0);
        assert_eq!(point.pressure, 1.0);
    }

    #[test]
    fn test_brush_is_copied_into_stroke() {
        let mut brush = Brush::default();
        let stroke = MutableStroke::new(brush, DrawingPoint::new(Pos2::ZERO, 1.0, 0.0)).into_stroke_ref();
        brush.size = 40.0;
        assert_eq!(stroke.brush().size, 5.0);
    }
}
