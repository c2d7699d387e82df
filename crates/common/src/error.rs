//! Error types shared across PromoKit crates.
//!
//! Every pipeline stage owns one error enum. [`AssetError`] wraps them so a
//! batch surfaces a single message that names the failing stage.

use std::path::PathBuf;

/// Template Renderer failures.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unknown template '{name}'")]
    UnknownTemplate { name: String },

    #[error("template '{template}' references missing field '{field}'")]
    MissingField { template: String, field: String },

    #[error("invalid campaign payload: {message}")]
    InvalidPayload { message: String },

    #[error("template '{template}' failed to render: {message}")]
    Engine { template: String, message: String },
}

/// Headless Capture Engine failures.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("browser failed to start: {message}")]
    EngineStart { message: String },

    #[error("could not create {width}x{height} capture surface: {message}")]
    Surface {
        width: u32,
        height: u32,
        message: String,
    },

    #[error("document did not settle within {timeout_ms}ms")]
    SettleTimeout { timeout_ms: u64 },

    #[error("snapshot failed: {message}")]
    Snapshot { message: String },

    #[error("browser shutdown failed: {message}")]
    Shutdown { message: String },
}

/// Image Compositor failures.
#[derive(Debug, thiserror::Error)]
pub enum CompositeError {
    #[error("background image not found: {path}")]
    BackgroundMissing { path: PathBuf },

    #[error("background image {path} could not be decoded: {message}")]
    BackgroundDecode { path: PathBuf, message: String },

    #[error("image has no alpha-capable color model: {message}")]
    ColorModel { message: String },

    #[error("snapshot {path} could not be decoded: {message}")]
    SnapshotDecode { path: PathBuf, message: String },

    #[error("foreground is {actual:?} but target is {expected:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("failed to write composite {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Archive Packager failures.
#[derive(Debug, thiserror::Error)]
pub enum PackagingError {
    #[error("final raster missing at packaging time: {path}")]
    MissingRaster { path: PathBuf },

    #[error("archive could not be written: {message}")]
    Archive { message: String },

    #[error("failed to remove {path} after archiving: {message}")]
    Cleanup { path: PathBuf, message: String },
}

/// Top-level error type for PromoKit operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("render stage failed: {0}")]
    Render(#[from] RenderError),

    #[error("capture stage failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("composite stage failed: {0}")]
    Composite(#[from] CompositeError),

    #[error("package stage failed: {0}")]
    Packaging(#[from] PackagingError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using AssetError.
pub type AssetResult<T> = Result<T, AssetError>;

pub type RenderResult<T> = Result<T, RenderError>;
pub type CaptureResult<T> = Result<T, CaptureError>;
pub type CompositeResult<T> = Result<T, CompositeError>;
pub type PackagingResult<T> = Result<T, PackagingError>;

impl AssetError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Short label of the pipeline stage that produced this error.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Render(_) => "render",
            Self::Capture(_) => "capture",
            Self::Composite(_) => "composite",
            Self::Packaging(_) => "package",
            Self::Config { .. } => "config",
            Self::FileNotFound { .. } | Self::Io(_) | Self::Json(_) => "io",
        }
    }
}

impl RenderError {
    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: msg.into(),
        }
    }
}

impl CaptureError {
    pub fn engine_start(msg: impl Into<String>) -> Self {
        Self::EngineStart {
            message: msg.into(),
        }
    }

    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot {
            message: msg.into(),
        }
    }
}

impl PackagingError {
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive {
            message: msg.into(),
        }
    }
}
