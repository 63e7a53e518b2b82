use std::path::PathBuf;
use thiserror::Error;

/// The main error type for scanlabel operations.
#[derive(Debug, Error)]
pub enum ScanlabelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse components JSON from {path}: {source}")]
    ComponentsJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse boxes JSON from {path}: {source}")]
    BoxesJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write boxes JSON to {path}: {source}")]
    BoxesJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid box set in {path}: {message}")]
    BoxesInvalid { path: PathBuf, message: String },

    #[error("Failed to parse settings from {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write settings to {path}: {source}")]
    SettingsWrite {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    #[error("Unsupported class: {0}")]
    UnsupportedClass(String),

    #[error("Duplicate box id {0} in working set")]
    DuplicateBoxId(crate::ir::BoxId),

    #[error("Invalid settings: {message}")]
    InvalidSettings { message: String },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Processing(#[from] ProcessingError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Problems with the source image or the requested crop.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("Source image is missing or has no pixels")]
    MissingImage,

    #[error(
        "Crop rectangle {x},{y} {width}x{height} does not fit inside the {image_width}x{image_height} image"
    )]
    CropOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },
}

/// A call into the image-processing collaborator failed.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Image processing failed during {stage}: {message}")]
pub struct ProcessingError {
    /// Name of the pipeline stage that failed.
    pub stage: &'static str,
    /// Collaborator-provided description.
    pub message: String,
}

impl ProcessingError {
    pub fn new(stage: &'static str, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

/// The export encoder cannot produce an artifact.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExportError {
    #[error("No boxes to export")]
    NoBoxes,

    #[error("Image dimensions unavailable ({width}x{height})")]
    DimensionsUnavailable { width: u32, height: u32 },

    #[error("Failed to encode export record: {message}")]
    Encode { message: String },
}
