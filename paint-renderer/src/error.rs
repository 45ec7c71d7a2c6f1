//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering, export or image import.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Resource loading or decoding failed.
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// Rasterizing a frame failed.
    #[error("Frame render failed: {0}")]
    Render(String),

    /// Encoding an export failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Reading an import from disk failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
