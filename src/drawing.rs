use egui::Pos2;

use crate::brush::{Brush, BrushUpdate};
use crate::event::Subject;
use crate::history::History;
use crate::state::SharedState;
use crate::stroke::{DrawingPoint, MutableStroke, Stroke, StrokeRef};
use crate::util::time;

/// Builds strokes from canvas-space samples and commits them to the history.
///
/// This is the only writer of the brush and history subjects.
pub struct DrawingService {
    brush: Subject<Brush>,
    history: Subject<History>,
    // Transient state: the stroke being drawn (if any)
    current_stroke: Option<MutableStroke>,
}

impl DrawingService {
    pub fn new(state: &SharedState) -> Self {
        Self {
            brush: state.brush.clone(),
            history: state.history.clone(),
            current_stroke: None,
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.current_stroke.is_some()
    }

    pub fn current_stroke(&self) -> Option<&MutableStroke> {
        self.current_stroke.as_ref()
    }

    /// Preview copy of the in-progress stroke
    pub fn preview_stroke(&self) -> Option<Stroke> {
        self.current_stroke.as_ref().map(MutableStroke::to_stroke)
    }

    pub fn brush(&self) -> Brush {
        self.brush.get()
    }

    /// Merge a partial brush update. Strokes already started keep their copy.
    pub fn update_brush(&self, update: &BrushUpdate) -> bool {
        self.brush.update(|brush| brush.apply(update))
    }

    /// Begin a stroke at a canvas-space point. Ignored while a stroke is active.
    pub fn start_stroke(&mut self, pos: Pos2, pressure: f32) -> bool {
        if self.current_stroke.is_some() {
            log::debug!("start_stroke ignored: a stroke is already in progress");
            return false;
        }
        let first = DrawingPoint::new(pos, pressure, time::monotonic_ms());
        self.current_stroke = Some(MutableStroke::new(self.brush.get(), first));
        true
    }

    /// Append a canvas-space sample. Ignored without an active stroke.
    pub fn continue_stroke(&mut self, pos: Pos2, pressure: f32) -> bool {
        match &mut self.current_stroke {
            Some(stroke) => {
                stroke.add_point(DrawingPoint::new(pos, pressure, time::monotonic_ms()));
                true
            }
            None => false,
        }
    }

    /// Commit the active stroke. The history is truncated and extended in one update.
    pub fn end_stroke(&mut self) -> Option<StrokeRef> {
        let stroke = self.current_stroke.take()?.into_stroke_ref();
        let committed = StrokeRef::clone(&stroke);
        self.history.update(move |history| {
            history.commit(committed);
            true
        });
        log::debug!(
            "Committed {:?} stroke with {} points",
            stroke.brush().brush_type,
            stroke.points().len()
        );
        Some(stroke)
    }

    pub fn undo(&self) -> bool {
        let done = self.history.update(History::undo);
        if done {
            log::info!("Undo");
        }
        done
    }

    pub fn redo(&self) -> bool {
        let done = self.history.update(History::redo);
        if done {
            log::info!("Redo");
        }
        done
    }

    pub fn clear(&self) -> bool {
        let done = self.history.update(History::clear);
        if done {
            log::info!("Canvas cleared");
        }
        done
    }

    pub fn can_undo(&self) -> bool {
        self.history.with(History::can_undo)
    }

    pub fn can_redo(&self) -> bool {
        self.history.with(History::can_redo)
    }
}
