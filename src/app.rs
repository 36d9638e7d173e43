use crate::brush::Brush;
use crate::canvas::RotatingCanvas;
use crate::config::{Config, ExportConfig};
use crate::export::{ExportJob, ExportRequest, ExportService};
use crate::input::InputHandler;
use crate::panels::{central_panel, settings_panel, tools_panel};
use crate::settings::CanvasSettings;
use crate::state::SharedState;
use crate::texture_manager::TextureManager;

/// Result of the last finished export, shown in the settings panel
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Saved(String),
    Failed(String),
}

pub struct SpinCanvasApp {
    canvas: RotatingCanvas,
    input: InputHandler,
    textures: TextureManager,
    exports: ExportService,
    export_job: Option<ExportJob>,
    export_config: ExportConfig,
    last_export: Option<ExportOutcome>,
}

impl SpinCanvasApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let canvas = RotatingCanvas::from_config(&config).unwrap_or_else(|err| {
            log::warn!("Invalid configuration, using defaults: {}", err);
            let state = SharedState::new(Brush::default(), CanvasSettings::default(), true);
            RotatingCanvas::new(state, config.radius_limits())
        });

        Self {
            canvas,
            input: InputHandler::new(egui::Rect::NOTHING),
            textures: TextureManager::new("rotating_canvas"),
            exports: ExportService::new(),
            export_job: None,
            export_config: config.export,
            last_export: None,
        }
    }

    pub fn canvas(&self) -> &RotatingCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut RotatingCanvas {
        &mut self.canvas
    }

    pub fn input_mut(&mut self) -> &mut InputHandler {
        &mut self.input
    }

    /// Render the canvas if needed and return its up-to-date texture
    pub fn canvas_texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureId> {
        let redraw = self.canvas.needs_redraw() || self.textures.texture_id().is_none();
        let frame = self.canvas.render()?;
        if !redraw {
            return self.textures.texture_id();
        }
        match self.textures.upload(ctx, frame) {
            Ok(texture) => Some(texture),
            Err(err) => {
                log::warn!("Canvas frame not shown: {}", err);
                None
            }
        }
    }

    pub fn exports(&self) -> &ExportService {
        &self.exports
    }

    pub fn export_config(&self) -> &ExportConfig {
        &self.export_config
    }

    pub fn export_config_mut(&mut self) -> &mut ExportConfig {
        &mut self.export_config
    }

    pub fn last_export(&self) -> Option<&ExportOutcome> {
        self.last_export.as_ref()
    }

    pub fn export_drawing_process(&mut self) {
        let request = ExportRequest::DrawingProcess {
            frame_delay_ms: self.export_config.frame_delay_ms,
        };
        self.start_export(request);
    }

    pub fn export_rotating_result(&mut self) {
        let request = ExportRequest::RotatingResult {
            duration_ms: self.export_config.duration_ms,
            frame_rate: self.export_config.frame_rate,
        };
        self.start_export(request);
    }

    fn start_export(&mut self, request: ExportRequest) {
        if self.export_job.is_some() {
            log::debug!("Export request ignored while another export runs");
            return;
        }
        let snapshot = self.canvas.export_snapshot();
        self.export_job = Some(self.exports.spawn(request, snapshot));
        self.last_export = None;
    }

    fn poll_export(&mut self) {
        let Some(job) = &mut self.export_job else {
            return;
        };
        let Some(result) = job.try_take() else {
            return;
        };
        self.export_job = None;

        let outcome = result.and_then(|artifact| artifact.save_to(&self.export_config.output_dir));
        self.last_export = Some(match outcome {
            Ok(path) => ExportOutcome::Saved(path.display().to_string()),
            Err(err) => {
                log::error!("Export failed: {}", err);
                ExportOutcome::Failed(err.to_string())
            }
        });
    }
}

impl eframe::App for SpinCanvasApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_export();

        // Rotation advances once per displayed frame
        let now_ms = ctx.input(|input| input.time) * 1000.0;
        self.canvas.tick(now_ms);

        tools_panel(self, ctx);
        settings_panel(self, ctx);
        central_panel(self, ctx);

        if self.canvas.is_rotating() || self.export_job.is_some() {
            ctx.request_repaint();
        }
    }
}
