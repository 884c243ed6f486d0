//! Error types shared by every module of the crate.

use thiserror::Error;

use crate::math::matrix::Shape;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, NetError>;

#[derive(Error, Debug)]
pub enum NetError {
    /// Operand shapes are incompatible for the named kernel operation.
    #[error("dimension mismatch in {op}: {left} vs {right}")]
    Dimension {
        op: &'static str,
        left: Shape,
        right: Shape,
    },

    /// A class label outside `[0, classes)`.
    #[error(
        "label {label} is out of range for {classes} output classes{}",
        .index.map(|i| format!(" (sample {})", i)).unwrap_or_default()
    )]
    InvalidLabel {
        label: usize,
        classes: usize,
        index: Option<usize>,
    },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Malformed sample data (IDX payloads, container lengths, sample width).
    #[error("invalid data: {0}")]
    Data(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetError {
    pub(crate) fn dimension(op: &'static str, left: Shape, right: Shape) -> NetError {
        NetError::Dimension { op, left, right }
    }
}
