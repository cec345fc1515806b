//! Mesh processing algorithms.
//!
//! - **Subdivision**: Catmull-Clark subdivision for triangle/quad meshes
//! - **Progress**: callback-based progress reporting shared by long runs

pub mod progress;
pub mod subdivide;

pub use progress::{Progress, Stage};
