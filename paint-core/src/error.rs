//! Error types for paint operations.
//!
//! Scene and interaction operations are tolerant and never fail; errors only
//! arise at the edges, when parsing user-supplied values.

use thiserror::Error;

/// Result type for paint operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in paint operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// A color string could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Invalid element operation.
    #[error("Invalid operation on element: {0}")]
    InvalidOperation(String),
}
