//! Mesh subdivision.
//!
//! # Catmull-Clark Subdivision
//!
//! Catmull-Clark subdivision (Catmull & Clark, 1978) is an approximating
//! subdivision scheme. This implementation accepts meshes made of triangles
//! and quads and always produces quads. Each iteration:
//!
//! 1. Creates a face point at each face centroid
//! 2. Creates an edge point per edge: the midpoint for boundary edges, or the
//!    average of both endpoints and both adjacent face points
//! 3. Moves original vertices using a valence-weighted average of their
//!    neighbourhood
//! 4. Connects every corner, its two edge points and the face point into a quad
//!
//! The adjacency model is rebuilt from scratch for every iteration, merging
//! vertices that share an exact position.
//!
//! # Example
//!
//! ```no_run
//! use quadsmooth::algo::subdivide::{catmull_clark_subdivide, SubdivideOptions};
//!
//! let mesh = quadsmooth::io::load("input.obj").unwrap();
//!
//! let options = SubdivideOptions::new(2); // 2 iterations
//! let refined = catmull_clark_subdivide(&mesh, &options).unwrap();
//!
//! quadsmooth::io::save(&refined, "output.obj").unwrap();
//! ```
//!
//! # References
//!
//! - Catmull, E. & Clark, J. (1978). "Recursively generated B-spline surfaces
//!   on arbitrary topological meshes." Computer-Aided Design, 10(6), 350-355.

mod catmull_clark;

pub use catmull_clark::{
    catmull_clark_subdivide, catmull_clark_subdivide_with_progress, edge_points, face_points,
    retessellate, subdivide_once, vertex_points,
};

use crate::error::Result;
use crate::mesh::Mesh;

/// Options for subdivision.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of subdivision iterations.
    pub iterations: usize,

    /// Whether to use parallel execution (default: true).
    ///
    /// The result is identical either way.
    pub parallel: bool,
}

impl SubdivideOptions {
    /// Create options with the specified number of iterations.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            parallel: true,
        }
    }

    /// Set the number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Apply `iterations` Catmull-Clark passes with default options.
///
/// Zero iterations returns a copy of `mesh`.
pub fn subdivide(mesh: &Mesh, iterations: usize) -> Result<Mesh> {
    catmull_clark_subdivide(mesh, &SubdivideOptions::new(iterations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_options_builder() {
        let options = SubdivideOptions::default();
        assert_eq!(options.iterations, 1);
        assert!(options.parallel);

        let options = SubdivideOptions::new(3).sequential();
        assert_eq!(options.iterations, 3);
        assert!(!options.parallel);

        let options = options.with_iterations(5).with_parallel(true);
        assert_eq!(options.iterations, 5);
        assert!(options.parallel);
    }

    #[test]
    fn test_subdivide_zero_iterations_copies() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = Mesh::from_polygons(vertices, &[[0usize, 1, 2]]).unwrap();
        let copy = subdivide(&mesh, 0).unwrap();
        assert_eq!(copy, mesh);
        assert_eq!(copy.num_triangles(), 1);
    }
}
