use egui::Vec2;
use tiny_skia::Pixmap;

use crate::brush::{Brush, BrushUpdate};
use crate::config::Config;
use crate::drawing::DrawingService;
use crate::error::ConfigError;
use crate::export::ExportSnapshot;
use crate::input::InputEvent;
use crate::mapper::InputMapper;
use crate::renderer::Renderer;
use crate::rotation::RotationEngine;
use crate::settings::{CanvasSettings, RadiusLimits, SettingsUpdate};
use crate::state::SharedState;

/// One drawing session on the rotating canvas.
///
/// Wires the rotation engine, drawing service and input mapper together over a
/// shared state, and keeps the rendered frame up to date.
pub struct RotatingCanvas {
    state: SharedState,
    rotation: RotationEngine,
    drawing: DrawingService,
    mapper: InputMapper,
    renderer: Renderer,
    frame: Option<Pixmap>,
    // Unknown until the first resize
    viewport: Option<Vec2>,
    limits: RadiusLimits,
    dirty: bool,
}

impl RotatingCanvas {
    pub fn new(state: SharedState, limits: RadiusLimits) -> Self {
        Self {
            rotation: RotationEngine::new(state.rotating.clone()),
            drawing: DrawingService::new(&state),
            mapper: InputMapper::new(),
            renderer: Renderer::new(),
            frame: None,
            viewport: None,
            limits,
            dirty: true,
            state,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(SharedState::from_config(config)?, config.radius_limits()))
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn settings(&self) -> CanvasSettings {
        self.state.settings.get()
    }

    pub fn brush(&self) -> Brush {
        self.drawing.brush()
    }

    pub fn angle(&self) -> f32 {
        self.rotation.angle()
    }

    pub fn is_rotating(&self) -> bool {
        self.rotation.is_rotating()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing.is_drawing()
    }

    pub fn viewport(&self) -> Option<Vec2> {
        self.viewport
    }

    pub fn radius_limits(&self) -> RadiusLimits {
        self.limits
    }

    /// Fit the canvas into the available space; the radius becomes maximal again
    pub fn resize(&mut self, viewport: Vec2) -> bool {
        if self.viewport == Some(viewport) {
            return false;
        }
        self.viewport = Some(viewport);
        let limits = self.limits;
        let changed = self
            .state
            .settings
            .update(|settings| settings.fit_viewport(viewport, &limits));
        if changed {
            log::debug!("Canvas fitted to {:?}", viewport);
            self.dirty = true;
        }
        changed
    }

    /// Advance the rotation to `now_ms`.
    ///
    /// While a stroke is in progress the stroke is extended so it stays under
    /// the pointer. Returns the applied angle step, `None` while paused.
    pub fn tick(&mut self, now_ms: f64) -> Option<f32> {
        let settings = self.state.settings.get();
        let delta = self.rotation.tick(now_ms, &settings)?;
        if delta != 0.0 {
            self.mapper
                .compensate(&mut self.drawing, delta, settings.rotation_center);
            self.dirty = true;
        }
        Some(delta)
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        let center = self.state.settings.with(|settings| settings.rotation_center);
        self.mapper
            .handle(event, &mut self.drawing, self.rotation.angle(), center);
        self.dirty = true;
    }

    /// Render the current frame if anything changed since the last call
    pub fn render(&mut self) -> Option<&Pixmap> {
        let settings = self.state.settings.get();
        let (width, height) = settings.pixel_size();
        let resized = self
            .frame
            .as_ref()
            .is_none_or(|frame| frame.width() != width || frame.height() != height);
        if resized {
            self.frame = Pixmap::new(width, height);
            self.dirty = true;
        }

        if self.dirty {
            let preview = self.drawing.preview_stroke();
            let frame = self.frame.as_mut()?;
            let history = self.state.history.get();
            self.renderer.render_frame(
                frame,
                self.rotation.angle(),
                &settings,
                history.active_strokes(),
                preview.as_ref(),
            );
            self.dirty = false;
        }
        self.frame.as_ref()
    }

    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    pub fn update_settings(&mut self, update: &SettingsUpdate) -> bool {
        let viewport = self.viewport;
        let limits = self.limits;
        let changed = self
            .state
            .settings
            .update(|settings| settings.apply(update, viewport, &limits));
        self.dirty |= changed;
        changed
    }

    pub fn update_brush(&mut self, update: &BrushUpdate) -> bool {
        self.drawing.update_brush(update)
    }

    pub fn set_rotating(&mut self, rotating: bool) {
        self.rotation.set_rotating(rotating);
    }

    pub fn toggle_rotation(&mut self) -> bool {
        self.rotation.toggle()
    }

    pub fn reset_rotation_center(&mut self) -> bool {
        let changed = self
            .state
            .settings
            .update(CanvasSettings::reset_rotation_center);
        self.dirty |= changed;
        changed
    }

    pub fn undo(&mut self) -> bool {
        let done = self.drawing.undo();
        self.dirty |= done;
        done
    }

    pub fn redo(&mut self) -> bool {
        let done = self.drawing.redo();
        self.dirty |= done;
        done
    }

    pub fn clear(&mut self) -> bool {
        let done = self.drawing.clear();
        self.dirty |= done;
        done
    }

    pub fn can_undo(&self) -> bool {
        self.drawing.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.drawing.can_redo()
    }

    pub fn stroke_count(&self) -> usize {
        self.state.history.with(|history| history.active_len())
    }

    pub fn export_snapshot(&self) -> ExportSnapshot {
        ExportSnapshot::capture(&self.state)
    }
}
