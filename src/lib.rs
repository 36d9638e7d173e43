#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod brush;
pub mod canvas;
pub mod color;
pub mod config;
pub mod drawing;
pub mod error;
pub mod event;
pub mod export;
pub mod geometry;
pub mod history;
pub mod input;
pub mod mapper;
pub mod panels;
pub mod renderer;
pub mod rotation;
pub mod settings;
pub mod state;
pub mod stroke;
pub mod texture_manager;
pub mod util;

pub use app::SpinCanvasApp;
pub use brush::{Brush, BrushType, BrushUpdate};
pub use canvas::RotatingCanvas;
pub use config::Config;
pub use drawing::DrawingService;
pub use error::{ColorParseError, ConfigError, ExportError, ExportResult};
pub use event::Subject;
pub use export::{ExportArtifact, ExportKind, ExportRequest, ExportService, ExportSnapshot};
pub use history::History;
pub use input::{InputEvent, InputHandler};
pub use mapper::InputMapper;
pub use renderer::Renderer;
pub use rotation::RotationEngine;
pub use settings::{CanvasSettings, RadiusLimits, RotationDirection, SettingsUpdate};
pub use state::SharedState;
pub use stroke::{DrawingPoint, Stroke, StrokeRef};
