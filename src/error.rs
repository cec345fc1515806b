//! Error types for quadsmooth.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

use crate::mesh::VertexId;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A vertex was moved onto the exact position of another vertex.
    ///
    /// Vertices are moved one at a time in index order, so this fires when
    /// a vertex lands on one that has not moved yet. Open meshes hit it
    /// when a corner lands on a neighbouring vertex, as do degenerate
    /// inputs with zero-length edges. The subdivision iteration that hit
    /// it is abandoned.
    #[error("topology error: moving {vertex:?} onto the position of {other:?}")]
    TopologyCollision {
        /// The vertex being moved.
        vertex: VertexId,
        /// The distinct vertex already at the destination.
        other: VertexId,
    },

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has a corner count other than 3 or 4.
    #[error("face {face} has {corners} corners (only triangles and quads are supported)")]
    InvalidFaceArity {
        /// The face index.
        face: usize,
        /// Number of corners found.
        corners: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}

impl MeshError {
    /// Whether this error reports a broken caller contract rather than a
    /// failure of the algorithm itself.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            MeshError::InvalidVertexIndex { .. } | MeshError::InvalidFaceArity { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeshError::TopologyCollision {
            vertex: VertexId::new(4),
            other: VertexId::new(1),
        };
        let display = err.to_string();
        assert!(display.contains("V(4)"));
        assert!(display.contains("V(1)"));

        let err = MeshError::InvalidFaceArity { face: 2, corners: 5 };
        assert!(err.to_string().contains("5 corners"));
    }

    #[test]
    fn test_precondition_classification() {
        assert!(MeshError::InvalidVertexIndex { face: 0, vertex: 9 }.is_precondition());
        assert!(MeshError::InvalidFaceArity { face: 0, corners: 2 }.is_precondition());
        let collision = MeshError::TopologyCollision {
            vertex: VertexId::new(0),
            other: VertexId::new(1),
        };
        assert!(!collision.is_precondition());
    }
}
