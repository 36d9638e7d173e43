use egui::Pos2;
use spin_canvas::{DrawingService, SharedState, StrokeRef};

fn draw(drawing: &mut DrawingService, x: f32) -> StrokeRef {
    drawing.start_stroke(Pos2::new(x, 0.0), 1.0);
    drawing.continue_stroke(Pos2::new(x, 10.0), 1.0);
    drawing.end_stroke().unwrap()
}

#[test]
fn test_commit_after_undo_truncates_redo_buffer() {
    let state = SharedState::default();
    let mut drawing = DrawingService::new(&state);

    let a = draw(&mut drawing, 1.0);
    draw(&mut drawing, 2.0);
    draw(&mut drawing, 3.0);
    assert!(drawing.undo());
    assert!(drawing.undo());
    assert_eq!(state.history.get().current_index(), Some(0));

    let d = draw(&mut drawing, 4.0);

    let history = state.history.get();
    assert_eq!(history.len(), 2);
    assert_eq!(history.current_index(), Some(1));
    assert!(StrokeRef::ptr_eq(&history.strokes()[0], &a));
    assert!(StrokeRef::ptr_eq(&history.strokes()[1], &d));
    assert!(!drawing.can_redo());
}

#[test]
fn test_undo_then_redo_restores_same_strokes() {
    let state = SharedState::default();
    let mut drawing = DrawingService::new(&state);
    draw(&mut drawing, 1.0);
    draw(&mut drawing, 2.0);

    let before = state.history.get();
    drawing.undo();
    assert_eq!(state.history.get().active_len(), 1);
    drawing.redo();
    let after = state.history.get();

    assert!(before.same_strokes(&after));
    assert_eq!(before.current_index(), after.current_index());
}

#[test]
fn test_invalid_state_operations_are_ignored() {
    let state = SharedState::default();
    let mut drawing = DrawingService::new(&state);

    assert!(!drawing.continue_stroke(Pos2::ZERO, 1.0));
    assert!(drawing.end_stroke().is_none());
    assert!(!drawing.undo());
    assert!(!drawing.redo());
    assert!(!drawing.clear());
    assert!(state.history.get().is_empty());

    drawing.start_stroke(Pos2::ZERO, 1.0);
    assert!(!drawing.start_stroke(Pos2::new(5.0, 5.0), 1.0));
    let stroke = drawing.end_stroke().unwrap();
    assert_eq!(stroke.points()[0].pos, Pos2::ZERO);
}

#[test]
fn test_end_stroke_moves_cursor_to_last() {
    let state = SharedState::default();
    let mut drawing = DrawingService::new(&state);
    for x in 0..5 {
        draw(&mut drawing, x as f32);
        let history = state.history.get();
        assert_eq!(history.current_index(), Some(history.len() - 1));
        assert!(!drawing.is_drawing());
    }
}

#[test]
fn test_history_subscribers_see_commits() {
    let state = SharedState::default();
    let mut drawing = DrawingService::new(&state);

    let seen = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = seen.clone();
    state.history.subscribe(move |history| sink.lock().push(history.active_len()));

    draw(&mut drawing, 1.0);
    draw(&mut drawing, 2.0);
    drawing.undo();
    drawing.clear();

    // replayed initial value, two commits, undo, clear
    assert_eq!(*seen.lock(), vec![0, 1, 2, 1, 0]);
}
