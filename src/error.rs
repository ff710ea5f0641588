//! Error types for tensile.
//!
//! Almost nothing in the kernel fails: degenerate energy terms contribute zero
//! instead of erroring. The variants here cover the few places where input is
//! checked strictly (buffer shapes, face indices, constraint parameters).

use thiserror::Error;

/// Result type alias using [`TensileError`].
pub type Result<T> = std::result::Result<T, TensileError>;

/// Errors that can occur in the energy kernel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensileError {
    /// A buffer did not have the length the embedding requires.
    #[error("dimension mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch {
        /// The required length.
        expected: usize,
        /// The length that was supplied.
        actual: usize,
    },

    /// A face references a vertex index outside the vertex range.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has too few vertices to form a ring of half-edges.
    #[error("face {face} has {degree} vertices (at least 3 required)")]
    DegenerateFace {
        /// The face index.
        face: usize,
        /// Number of vertices in the face.
        degree: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl TensileError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        TensileError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a dimension mismatch error.
    pub(crate) fn mismatch(expected: usize, actual: usize) -> Self {
        TensileError::DimensionMismatch { expected, actual }
    }
}
