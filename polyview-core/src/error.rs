//! Error types for polyview

use thiserror::Error;

/// Main error type for polyview operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid contour: {0}")]
    InvalidContour(String),

    #[error("triangulation error: {0}")]
    Triangulation(String),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("texture error: {0}")]
    Texture(String),

    #[error("window error: {0}")]
    Window(String),
}

/// Result type alias for polyview operations
pub type Result<T> = std::result::Result<T, Error>;
