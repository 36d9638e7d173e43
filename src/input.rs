use egui::{Context, Event, PointerButton, Pos2, Rect, TouchPhase};

/// Pointer input in canvas-relative coordinates (origin at the canvas' top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { pos: Pos2, pressure: f32 },
    PointerMove { pos: Pos2, pressure: f32 },
    PointerUp,
    PointerCancel,
}

/// Handles converting raw egui input into our canvas InputEvents
#[derive(Debug, Clone)]
pub struct InputHandler {
    canvas_rect: Rect,
    pressed: bool,
    // Force reported by the most recent touch, if the device has one
    touch_force: Option<f32>,
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            canvas_rect,
            pressed: false,
            touch_force: None,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    fn relative(&self, pos: Pos2) -> Pos2 {
        (pos - self.canvas_rect.min).to_pos2()
    }

    fn pressure(&self) -> f32 {
        self.touch_force.unwrap_or(1.0)
    }

    /// Process this frame's raw egui input
    pub fn process_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        ctx.input(|input| self.process_events(&input.raw.events))
    }

    /// Translate raw events. Presses only start inside the canvas; moves and
    /// releases are tracked wherever the pointer goes while pressed.
    pub fn process_events(&mut self, events: &[Event]) -> Vec<InputEvent> {
        let mut out = Vec::new();

        for event in events {
            match event {
                Event::Touch { phase, force, .. } => match phase {
                    TouchPhase::Start | TouchPhase::Move => self.touch_force = *force,
                    TouchPhase::End => self.touch_force = None,
                    TouchPhase::Cancel => {
                        self.touch_force = None;
                        if self.pressed {
                            self.pressed = false;
                            out.push(InputEvent::PointerCancel);
                        }
                    }
                },
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    if *pressed && !self.pressed && self.canvas_rect.contains(*pos) {
                        self.pressed = true;
                        out.push(InputEvent::PointerDown {
                            pos: self.relative(*pos),
                            pressure: self.pressure(),
                        });
                    } else if !*pressed && self.pressed {
                        self.pressed = false;
                        out.push(InputEvent::PointerUp);
                    }
                }
                Event::PointerMoved(pos) if self.pressed => {
                    out.push(InputEvent::PointerMove {
                        pos: self.relative(*pos),
                        pressure: self.pressure(),
                    });
                }
                Event::PointerGone if self.pressed => {
                    self.pressed = false;
                    out.push(InputEvent::PointerCancel);
                }
                _ => {}
            }
        }

        out
    }
}
