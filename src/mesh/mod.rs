//! Core mesh data structures.
//!
//! This module provides the flat mesh exchange type and the adjacency
//! model that subdivision works on.
//!
//! # Overview
//!
//! - [`Mesh`] stores vertex positions and a list of triangle/quad [`Face`]s.
//!   It is what loaders return and what subdivision produces.
//! - [`Topology`] is built from a [`Mesh`] and merges coincident vertices,
//!   identifies shared edges and cross-indexes vertices, edges and faces.
//!
//! # Index Types
//!
//! Topology records are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`EdgeId`] - Identifies an edge
//! - [`FaceId`] - Identifies a face
//!
//! # Construction
//!
//! ```
//! use quadsmooth::mesh::{Mesh, Topology};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let mesh = Mesh::from_polygons(vertices, &[[0usize, 1, 2]]).unwrap();
//!
//! let topology = Topology::from_mesh(&mesh).unwrap();
//! assert_eq!(topology.num_edges(), 3);
//! ```

mod index;
mod key;
mod polygon;
mod topology;

pub use index::{EdgeId, FaceId, VertexId};
pub use key::PositionKey;
pub use polygon::{Face, Mesh};
pub use topology::{EdgeRecord, FaceRecord, MeshStats, Topology, VertexRecord};

impl Mesh {
    /// Element counts after merging coincident vertices.
    pub fn stats(&self) -> crate::error::Result<MeshStats> {
        Ok(Topology::from_mesh(self)?.stats())
    }
}
