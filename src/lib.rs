//! # quadsmooth
//!
//! Catmull-Clark subdivision for polygon meshes made of triangles and quads.
//!
//! quadsmooth turns a coarse control mesh into a smoother, denser all-quad
//! mesh. Each pass builds an adjacency model of the input (merging vertices
//! that share an exact position), computes face, edge and vertex points, and
//! re-tessellates every face into one quad per corner.
//!
//! ## Features
//!
//! - **Adjacency model**: vertex/edge/face records with type-safe indices
//! - **Catmull-Clark**: boundary-aware edge rule, valence-weighted vertex rule
//! - **Parallel stages**: per-element stages run on rayon with identical output
//! - **File formats**: OBJ and STL
//!
//! ## Quick Start
//!
//! ```no_run
//! use quadsmooth::prelude::*;
//!
//! // Load a mesh
//! let mesh = quadsmooth::io::load("model.obj").unwrap();
//!
//! // Two Catmull-Clark passes
//! let refined = subdivide(&mesh, 2).unwrap();
//! println!("Quads: {}", refined.num_quads());
//!
//! // Save the result
//! quadsmooth::io::save(&refined, "refined.obj").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use quadsmooth::prelude::*;
//! use nalgebra::Point3;
//!
//! // A tetrahedron
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = [[0usize, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! let mesh = Mesh::from_polygons(vertices, &faces).unwrap();
//!
//! // Inspect adjacency
//! let topology = Topology::from_mesh(&mesh).unwrap();
//! assert_eq!(topology.num_edges(), 6);
//! assert_eq!(topology.boundary_edge_count(), 0);
//!
//! let options = SubdivideOptions::new(1).sequential();
//! let refined = catmull_clark_subdivide(&mesh, &options).unwrap();
//! assert_eq!(refined.num_quads(), 12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use quadsmooth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::subdivide::{catmull_clark_subdivide, subdivide, SubdivideOptions};
    pub use crate::algo::Progress;
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{EdgeId, Face, FaceId, Mesh, Topology, VertexId};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_cube_pipeline() {
        let vertices = vec![
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(1.0, 1.0, -1.0),
            Point3::new(-1.0, 1.0, -1.0),
            Point3::new(-1.0, -1.0, 1.0),
            Point3::new(1.0, -1.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-1.0, 1.0, 1.0),
        ];
        let faces = [
            [0usize, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [2, 3, 7, 6],
            [1, 2, 6, 5],
            [3, 0, 4, 7],
        ];
        let mesh = Mesh::from_polygons(vertices, &faces).unwrap();

        let topology = Topology::from_mesh(&mesh).unwrap();
        assert_eq!(topology.num_vertices(), 8);
        assert_eq!(topology.num_edges(), 12);
        assert_eq!(topology.boundary_edge_count(), 0);

        let refined = subdivide(&mesh, 1).unwrap();
        assert_eq!(refined.num_quads(), 24);
        assert!(refined.is_quad_mesh());

        let stats = refined.stats().unwrap();
        assert_eq!(stats.vertices, 26);
        assert_eq!(stats.edges, 48);
        assert_eq!(stats.boundary_edges, 0);
    }
}
