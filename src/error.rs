use thiserror::Error;

/// Errors that can occur while producing an animated export
#[derive(Debug, Error)]
pub enum ExportError {
    /// Another export is still in flight
    #[error("An export is already in progress")]
    Busy,

    /// The canvas has no usable pixel area to render into
    #[error("Canvas is not available for export ({width}x{height})")]
    CanvasUnavailable { width: u32, height: u32 },

    /// There is no committed artwork to replay
    #[error("Nothing to export: the drawing has no strokes")]
    NothingToExport,

    #[error("Invalid export parameters: {0}")]
    InvalidParameters(String),

    #[error("Frame encoder failed: {0}")]
    Encoder(#[from] image::ImageError),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    /// The worker running the export went away before reporting a result
    #[error("Export was dropped before completing")]
    Cancelled,
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors produced when parsing a `#rrggbb` or `#rrggbbaa` color string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Color must start with '#': {0:?}")]
    MissingHash(String),

    #[error("Color must have 6 or 8 hex digits: {0:?}")]
    InvalidLength(String),

    #[error("Invalid hex digit in color: {0:?}")]
    InvalidDigit(String),
}

/// Errors that can occur while loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid color in config: {0}")]
    InvalidColor(#[from] ColorParseError),
}
