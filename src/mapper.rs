use egui::Pos2;

use crate::drawing::DrawingService;
use crate::geometry::{compensate_rotation, to_canvas_space};
use crate::input::InputEvent;

/// Maps canvas-relative pointer input into the unrotated canvas frame and
/// keeps the in-progress stroke glued to the pointer while the canvas turns.
#[derive(Debug, Clone)]
pub struct InputMapper {
    // Last canvas-space point appended to the active stroke
    last_point: Option<Pos2>,
    last_pressure: f32,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl InputMapper {
    pub fn new() -> Self {
        Self {
            last_point: None,
            last_pressure: 1.0,
        }
    }

    pub fn last_point(&self) -> Option<Pos2> {
        self.last_point
    }

    /// Route one input event, using the rotation `angle` at this instant
    pub fn handle(&mut self, event: InputEvent, drawing: &mut DrawingService, angle: f32, center: Pos2) {
        match event {
            InputEvent::PointerDown { pos, pressure } => self.pointer_down(drawing, pos, pressure, angle, center),
            InputEvent::PointerMove { pos, pressure } => self.pointer_move(drawing, pos, pressure, angle, center),
            InputEvent::PointerUp | InputEvent::PointerCancel => self.pointer_up(drawing),
        }
    }

    pub fn pointer_down(&mut self, drawing: &mut DrawingService, pos: Pos2, pressure: f32, angle: f32, center: Pos2) {
        let point = to_canvas_space(pos, angle, center);
        if drawing.start_stroke(point, pressure) {
            self.last_point = Some(point);
            self.last_pressure = pressure;
        }
    }

    pub fn pointer_move(&mut self, drawing: &mut DrawingService, pos: Pos2, pressure: f32, angle: f32, center: Pos2) {
        if self.last_point.is_none() || !drawing.is_drawing() {
            return;
        }
        let point = to_canvas_space(pos, angle, center);
        drawing.continue_stroke(point, pressure);
        self.last_point = Some(point);
        self.last_pressure = pressure;
    }

    pub fn pointer_up(&mut self, drawing: &mut DrawingService) {
        self.last_point = None;
        drawing.end_stroke();
    }

    /// After the canvas turned by `angle_delta` degrees, re-project the last
    /// point so it sits under the (unmoved) pointer again and append it.
    ///
    /// Only the latest point moves; earlier samples stay fixed in canvas space.
    pub fn compensate(&mut self, drawing: &mut DrawingService, angle_delta: f32, center: Pos2) {
        if angle_delta == 0.0 || !drawing.is_drawing() {
            return;
        }
        if let Some(last) = self.last_point {
            let point = compensate_rotation(last, angle_delta, center);
            drawing.continue_stroke(point, self.last_pressure);
            self.last_point = Some(point);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::to_screen_space;
    use crate::state::SharedState;

    const CENTER: Pos2 = Pos2::new(100.0, 100.0);

    #[test]
    fn test_press_uses_inverse_rotation() {
        let state = SharedState::default();
        let mut drawing = DrawingService::new(&state);
        let mut mapper = InputMapper::new();

        let screen = Pos2::new(150.0, 100.0);
        mapper.pointer_down(&mut drawing, screen, 1.0, 90.0, CENTER);

        let stored = drawing.current_stroke().unwrap().points()[0].pos;
        assert!((stored - Pos2::new(100.0, 50.0)).length() < 1e-3);
        // rendering the stored point at the same angle lands under the pointer
        assert!((to_screen_space(stored, 90.0, CENTER) - screen).length() < 1e-3);
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let state = SharedState::default();
        let mut drawing = DrawingService::new(&state);
        let mut mapper = InputMapper::new();
        mapper.pointer_move(&mut drawing, Pos2::new(10.0, 10.0), 1.0, 0.0, CENTER);
        assert!(!drawing.is_drawing());
        mapper.pointer_up(&mut drawing);
        assert!(state.history.get().is_empty());
    }

    #[test]
    fn test_compensation_tracks_still_pointer() {
        let state = SharedState::default();
        let mut drawing = DrawingService::new(&state);
        let mut mapper = InputMapper::new();

        let screen = Pos2::new(160.0, 100.0);
        mapper.pointer_down(&mut drawing, screen, 0.6, 0.0, CENTER);
        mapper.compensate(&mut drawing, 30.0, CENTER);

        let points = drawing.current_stroke().unwrap().points().to_vec();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].pos, Pos2::new(160.0, 100.0));
        assert!((to_screen_space(points[1].pos, 30.0, CENTER) - screen).length() < 1e-3);
        assert_eq!(points[1].pressure, 0.6);
        assert_eq!(mapper.last_point(), Some(points[1].pos));
    }

    #[test]
    fn test_release_commits_and_forgets_last_point() {
        let state = SharedState::default();
        let mut drawing = DrawingService::new(&state);
        let mut mapper = InputMapper::new();
        mapper.handle(InputEvent::PointerDown { pos: Pos2::new(1.0, 1.0), pressure: 1.0 }, &mut drawing, 0.0, CENTER);
        mapper.handle(InputEvent::PointerCancel, &mut drawing, 0.0, CENTER);
        assert_eq!(mapper.last_point(), None);
        assert_eq!(state.history.get().len(), 1);

        mapper.compensate(&mut drawing, 5.0, CENTER);
        assert_eq!(state.history.get().strokes()[0].points().len(), 1);
    }
}
