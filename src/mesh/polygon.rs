//! Flat face-vertex meshes made of triangles and quads.
//!
//! [`Mesh`] is the exchange format of the crate: loaders produce it,
//! subdivision consumes and returns it, and savers write it out. It makes
//! no promise about shared vertices; two faces may reference different
//! vertex slots holding the same position.

use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::{MeshError, Result};

/// A single face of a [`Mesh`], as vertex indices in winding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// Three corners.
    Triangle([usize; 3]),
    /// Four corners.
    Quad([usize; 4]),
}

impl Face {
    /// Build a face from a corner list.
    ///
    /// Returns `None` unless the list has exactly 3 or 4 entries.
    pub fn from_slice(indices: &[usize]) -> Option<Self> {
        match *indices {
            [a, b, c] => Some(Face::Triangle([a, b, c])),
            [a, b, c, d] => Some(Face::Quad([a, b, c, d])),
            _ => None,
        }
    }

    /// The corner indices in winding order.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        match self {
            Face::Triangle(v) => v,
            Face::Quad(v) => v,
        }
    }

    /// Number of corners (3 or 4).
    #[inline]
    pub fn corner_count(&self) -> usize {
        self.indices().len()
    }

    /// Whether this face is a quad.
    #[inline]
    pub fn is_quad(&self) -> bool {
        matches!(self, Face::Quad(_))
    }
}

/// A polygon mesh stored as a vertex list plus a face list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions. Not deduplicated.
    pub vertices: Vec<Point3<f64>>,
    /// Faces referencing `vertices`.
    pub faces: Vec<Face>,
}

impl Mesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mesh with preallocated storage.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            faces: Vec::with_capacity(num_faces),
        }
    }

    /// Build a mesh from positions and variable-length corner lists.
    ///
    /// Every polygon must have 3 or 4 corners and reference existing
    /// vertices.
    ///
    /// # Example
    /// ```
    /// use quadsmooth::mesh::Mesh;
    /// use nalgebra::Point3;
    ///
    /// let vertices = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(1.0, 1.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// ];
    /// let mesh = Mesh::from_polygons(vertices, &[vec![0usize, 1, 2, 3]]).unwrap();
    /// assert_eq!(mesh.num_quads(), 1);
    /// ```
    pub fn from_polygons<P: AsRef<[usize]>>(
        vertices: Vec<Point3<f64>>,
        polygons: &[P],
    ) -> Result<Self> {
        let mut faces = Vec::with_capacity(polygons.len());
        for (fi, polygon) in polygons.iter().enumerate() {
            let corners = polygon.as_ref();
            let face = Face::from_slice(corners).ok_or(MeshError::InvalidFaceArity {
                face: fi,
                corners: corners.len(),
            })?;
            faces.push(face);
        }

        let mesh = Self { vertices, faces };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> usize {
        self.vertices.push(position);
        self.vertices.len() - 1
    }

    /// Append a face.
    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    /// Check that every face references an existing vertex.
    pub fn validate(&self) -> Result<()> {
        for (fi, face) in self.faces.iter().enumerate() {
            if let Some(&vi) = face.indices().iter().find(|&&vi| vi >= self.vertices.len()) {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        Ok(())
    }

    /// Number of vertex slots (including duplicates).
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Number of triangular faces.
    pub fn num_triangles(&self) -> usize {
        self.faces.iter().filter(|f| !f.is_quad()).count()
    }

    /// Number of quad faces.
    pub fn num_quads(&self) -> usize {
        self.faces.iter().filter(|f| f.is_quad()).count()
    }

    /// Whether every face is a quad.
    pub fn is_quad_mesh(&self) -> bool {
        self.faces.iter().all(Face::is_quad)
    }

    /// Positions of a face's corners in winding order.
    pub fn face_positions(&self, face: usize) -> impl Iterator<Item = &Point3<f64>> + '_ {
        self.faces[face].indices().iter().map(move |&vi| &self.vertices[vi])
    }

    /// Arithmetic mean of a face's corners.
    pub fn face_centroid(&self, face: usize) -> Point3<f64> {
        let n = self.faces[face].corner_count() as f64;
        let sum: Vector3<f64> = self.face_positions(face).map(|p| p.coords).sum();
        Point3::from(sum / n)
    }

    /// Axis-aligned bounds of all face-referenced vertices.
    ///
    /// Vertices that no face uses do not contribute.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut corners = self
            .faces
            .iter()
            .flat_map(|f| f.indices().iter())
            .filter_map(|&vi| self.vertices.get(vi));

        let first = *corners.next()?;
        let (mut min, mut max) = (first, first);
        for p in corners {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Some((min, max))
    }

    /// Transform that fits the mesh into `[-0.5, 0.5]^3`.
    ///
    /// The bounding box is centred on the origin and scaled uniformly so its
    /// longest side has unit length. Returns `None` for meshes without faces
    /// or with zero extent.
    pub fn unit_cube_transform(&self) -> Option<Matrix4<f64>> {
        let (low, high) = self.bounding_box()?;
        let max_extent = (high - low).max();
        if max_extent <= 0.0 || !max_extent.is_finite() {
            return None;
        }

        let translation = -(low.coords + high.coords) * 0.5;
        Some(Matrix4::new_scaling(1.0 / max_extent) * Matrix4::new_translation(&translation))
    }

    /// Apply [`unit_cube_transform`](Self::unit_cube_transform) in place.
    ///
    /// Returns `false` and leaves the mesh unchanged when no transform exists.
    pub fn normalize_to_unit_cube(&mut self) -> bool {
        match self.unit_cube_transform() {
            Some(transform) => {
                for p in &mut self.vertices {
                    *p = transform.transform_point(p);
                }
                true
            }
            None => false,
        }
    }
}
