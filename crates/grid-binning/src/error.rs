//! Error types for grid binning.

use thiserror::Error;

use crate::types::Axis;

/// Errors that can occur while building a grid or binning a batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridBinningError {
    /// The unit tag is not one of `degrees`, `relative`, `meters`.
    #[error("unknown unit mode '{0}' (expected degrees, relative or meters)")]
    UnknownUnitMode(String),

    /// An axis would end up with fewer than one cell.
    #[error("degenerate {axis} axis: {reason}")]
    DegenerateAxis { axis: Axis, reason: String },

    /// The requested resolution would produce more cells than the grid allows.
    #[error("{what} would need {cells} cells, limit is {limit}")]
    TooManyCells {
        what: String,
        cells: f64,
        limit: usize,
    },

    /// Input arrays do not have the expected shape.
    #[error("shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: String,
        actual: String,
    },

    /// A cell id fell outside the grid. Clipping makes this unreachable for
    /// indexer output, so seeing it means the caller passed foreign ids.
    #[error("cell index {index} out of range for grid with {len} cells")]
    IndexOutOfRange { index: usize, len: usize },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GridBinningError {
    /// Create a DegenerateAxis error.
    pub fn degenerate(axis: Axis, reason: impl Into<String>) -> Self {
        Self::DegenerateAxis {
            axis,
            reason: reason.into(),
        }
    }

    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(
        what: &'static str,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Self::ShapeMismatch {
            what,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<serde_yaml::Error> for GridBinningError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for grid binning operations.
pub type Result<T> = std::result::Result<T, GridBinningError>;
