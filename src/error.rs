//! Application-level error types.

use thiserror::Error;

/// Errors that can occur within the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed frame: {0}")]
    FrameFormat(String),

    #[error("can't set a palette bitmap before the canvas has been measured")]
    CanvasNotMeasured,

    #[error("bitmap or target size is empty")]
    EmptyBitmap,

    #[error("camera binding failed: {0}")]
    CameraBinding(String),
}

/// Convenience alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;
