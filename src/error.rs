//! Error types for chart slot rendering.

use thiserror::Error;

/// Errors raised while normalizing or dispatching chart data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// A data bin is neither a numeric interval nor a special category, or has a non-finite boundary.
    #[error("invalid data bin at index {index}: {reason}")]
    InvalidBinRecord { index: usize, reason: String },

    /// An upstream data source rejected.
    #[error("failed to load chart data: {0}")]
    LoadFailure(String),

    /// The container asked the renderer for a kind it cannot draw.
    #[error("unrenderable chart kind: {0}")]
    UnrenderableKind(String),
}

impl ChartError {
    pub(crate) fn invalid_bin(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidBinRecord {
            index,
            reason: reason.into(),
        }
    }
}
