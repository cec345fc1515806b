//! Adjacency model built from a flat [`Mesh`].
//!
//! [`Topology`] is an arena of vertex, edge and face records that refer to
//! each other by typed index. It is rebuilt from scratch for every
//! subdivision pass.
//!
//! # Identity
//!
//! - Vertices are identified by exact position: two mesh vertices at the
//!   same coordinates become one topological vertex (see [`PositionKey`]).
//! - Edges are identified by their unordered endpoint pair, stored with the
//!   lower index first.
//!
//! Indices are handed out in first-seen order while scanning faces front to
//! back and corners in winding order, so the same mesh always produces the
//! same numbering.
//!
//! # Non-manifold edges
//!
//! An edge records at most two incident faces. A third face touching the
//! same edge still lists the edge among its own edges, but the edge does
//! not list that face. Later stages treat such an edge as if only the
//! first two faces existed.

use std::collections::HashMap;

use log::trace;
use nalgebra::Point3;

use super::index::{EdgeId, FaceId, VertexId};
use super::key::PositionKey;
use super::polygon::Mesh;
use crate::error::{MeshError, Result};

/// A topological vertex.
#[derive(Debug, Clone)]
pub struct VertexRecord {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// Incident edges, one entry per face side that touches this vertex.
    ///
    /// An edge shared by two faces therefore appears twice.
    pub edges: Vec<EdgeId>,

    /// Incident faces, one entry per face corner at this vertex.
    pub faces: Vec<FaceId>,
}

impl VertexRecord {
    fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            edges: Vec::new(),
            faces: Vec::new(),
        }
    }
}

/// A topological edge.
#[derive(Debug, Clone)]
pub struct EdgeRecord {
    /// Endpoint with the smaller index.
    pub low: VertexId,

    /// Endpoint with the larger index.
    pub high: VertexId,

    /// Up to two incident faces; unused slots are invalid.
    pub faces: [FaceId; 2],

    /// Number of recorded faces (1 for boundary, 2 for interior).
    pub face_count: usize,
}

impl EdgeRecord {
    fn new(low: VertexId, high: VertexId) -> Self {
        Self {
            low,
            high,
            faces: [FaceId::INVALID; 2],
            face_count: 0,
        }
    }

    /// The recorded incident faces.
    #[inline]
    pub fn incident_faces(&self) -> &[FaceId] {
        &self.faces[..self.face_count]
    }

    /// Whether only one face was recorded for this edge.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.face_count < 2
    }

    fn attach_face(&mut self, face: FaceId) {
        // Saturates at two faces; extra incidences are dropped.
        if self.face_count < 2 {
            self.faces[self.face_count] = face;
            self.face_count += 1;
        }
    }
}

/// A topological face.
#[derive(Debug, Clone)]
pub struct FaceRecord {
    /// Whether the face has four corners.
    pub is_quad: bool,

    /// Corner vertices in winding order. The last slot is invalid for triangles.
    pub vertices: [VertexId; 4],

    /// Edge `i` joins corner `i` and corner `(i + 1) % n`.
    pub edges: [EdgeId; 4],
}

impl FaceRecord {
    /// Number of corners (3 or 4).
    #[inline]
    pub fn corner_count(&self) -> usize {
        if self.is_quad {
            4
        } else {
            3
        }
    }

    /// Corner vertices in winding order.
    #[inline]
    pub fn corners(&self) -> &[VertexId] {
        &self.vertices[..self.corner_count()]
    }

    /// Edges in the same cyclic order as [`corners`](Self::corners).
    #[inline]
    pub fn sides(&self) -> &[EdgeId] {
        &self.edges[..self.corner_count()]
    }
}

/// Element counts of a mesh after positional deduplication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshStats {
    /// Distinct vertex positions.
    pub vertices: usize,
    /// Distinct edges.
    pub edges: usize,
    /// Edges with a single incident face.
    pub boundary_edges: usize,
    /// Triangular faces.
    pub triangles: usize,
    /// Quad faces.
    pub quads: usize,
}

/// Indexed vertex/edge/face adjacency.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    vertices: Vec<VertexRecord>,
    edges: Vec<EdgeRecord>,
    faces: Vec<FaceRecord>,

    position_to_vertex: HashMap<PositionKey, VertexId>,
    pair_to_edge: HashMap<(VertexId, VertexId), EdgeId>,
}

impl Topology {
    /// Build the adjacency model of a mesh.
    ///
    /// Fails only if the mesh references vertices that do not exist.
    ///
    /// # Example
    /// ```
    /// use quadsmooth::mesh::{Mesh, Topology};
    /// use nalgebra::Point3;
    ///
    /// // Two triangles with their shared corners stored twice.
    /// let vertices = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(1.0, 1.0, 0.0),
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 1.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// ];
    /// let mesh = Mesh::from_polygons(vertices, &[[0usize, 1, 2], [3, 4, 5]]).unwrap();
    ///
    /// let topology = Topology::from_mesh(&mesh).unwrap();
    /// assert_eq!(topology.num_vertices(), 4);
    /// assert_eq!(topology.num_edges(), 5);
    /// ```
    pub fn from_mesh(mesh: &Mesh) -> Result<Self> {
        mesh.validate()?;

        let mut topology = Self {
            vertices: Vec::with_capacity(mesh.num_vertices()),
            edges: Vec::with_capacity(mesh.num_faces() * 2),
            faces: Vec::with_capacity(mesh.num_faces()),
            position_to_vertex: HashMap::with_capacity(mesh.num_vertices()),
            pair_to_edge: HashMap::with_capacity(mesh.num_faces() * 2),
        };

        for face in &mesh.faces {
            let corners = face.indices();
            let n = corners.len();

            let mut vertex_ids = [VertexId::INVALID; 4];
            for (slot, &vi) in vertex_ids.iter_mut().zip(corners) {
                *slot = topology.vertex_index(&mesh.vertices[vi]);
            }

            let mut edge_ids = [EdgeId::INVALID; 4];
            for i in 0..n {
                let start = vertex_ids[i];
                let end = vertex_ids[(i + 1) % n];
                let edge = topology.edge_index(start, end);

                edge_ids[i] = edge;
                topology.vertices[start.index()].edges.push(edge);
                topology.vertices[end.index()].edges.push(edge);
            }

            let face_id = FaceId::new(topology.faces.len());
            topology.faces.push(FaceRecord {
                is_quad: face.is_quad(),
                vertices: vertex_ids,
                edges: edge_ids,
            });

            for v in &vertex_ids[..n] {
                topology.vertices[v.index()].faces.push(face_id);
            }
            for e in &edge_ids[..n] {
                topology.edges[e.index()].attach_face(face_id);
            }
        }

        trace!(
            "topology: {} vertex slots -> {} vertices, {} edges, {} faces",
            mesh.num_vertices(),
            topology.num_vertices(),
            topology.num_edges(),
            topology.num_faces()
        );
        Ok(topology)
    }

    /// Look up the vertex at `position`, inserting a new one if none exists.
    pub fn vertex_index(&mut self, position: &Point3<f64>) -> VertexId {
        let key = PositionKey::new(position);
        if let Some(&v) = self.position_to_vertex.get(&key) {
            return v;
        }

        let v = VertexId::new(self.vertices.len());
        self.vertices.push(VertexRecord::new(*position));
        self.position_to_vertex.insert(key, v);
        v
    }

    /// Look up the edge joining `a` and `b`, inserting a new one if none exists.
    ///
    /// The argument order does not matter.
    pub fn edge_index(&mut self, a: VertexId, b: VertexId) -> EdgeId {
        let pair = sorted_pair(a, b);
        if let Some(&e) = self.pair_to_edge.get(&pair) {
            return e;
        }

        let e = EdgeId::new(self.edges.len());
        self.edges.push(EdgeRecord::new(pair.0, pair.1));
        self.pair_to_edge.insert(pair, e);
        e
    }

    /// Find the vertex at exactly `position`.
    pub fn find_vertex(&self, position: &Point3<f64>) -> Option<VertexId> {
        self.position_to_vertex.get(&PositionKey::new(position)).copied()
    }

    /// Find the edge joining `a` and `b`, in either order.
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.pair_to_edge.get(&sorted_pair(a, b)).copied()
    }

    /// Move a vertex to a new position, re-keying the position map.
    ///
    /// Fails with [`MeshError::TopologyCollision`] if a different vertex
    /// already sits at `position`; the model is left unchanged in that case.
    /// Moving a vertex onto its own position is allowed.
    pub fn move_vertex(&mut self, v: VertexId, position: Point3<f64>) -> Result<()> {
        let new_key = PositionKey::new(&position);
        if let Some(&other) = self.position_to_vertex.get(&new_key) {
            if other != v {
                return Err(MeshError::TopologyCollision { vertex: v, other });
            }
        }

        let record = &mut self.vertices[v.index()];
        self.position_to_vertex.remove(&PositionKey::new(&record.position));
        self.position_to_vertex.insert(new_key, v);
        record.position = position;
        Ok(())
    }

    // ==================== Accessors ====================

    /// Number of distinct vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of distinct edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get a vertex record.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &VertexRecord {
        &self.vertices[id.index()]
    }

    /// Get an edge record.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &EdgeRecord {
        &self.edges[id.index()]
    }

    /// Get a face record.
    #[inline]
    pub fn face(&self, id: FaceId) -> &FaceRecord {
        &self.faces[id.index()]
    }

    /// All vertex records, indexed by [`VertexId`].
    #[inline]
    pub fn vertices(&self) -> &[VertexRecord] {
        &self.vertices
    }

    /// All edge records, indexed by [`EdgeId`].
    #[inline]
    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    /// All face records, indexed by [`FaceId`].
    #[inline]
    pub fn faces(&self) -> &[FaceRecord] {
        &self.faces
    }

    /// Position of a vertex.
    #[inline]
    pub fn position(&self, id: VertexId) -> &Point3<f64> {
        &self.vertices[id.index()].position
    }

    /// Copy of every vertex position, indexed by [`VertexId`].
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Number of faces incident to a vertex.
    #[inline]
    pub fn valence(&self, id: VertexId) -> usize {
        self.vertices[id.index()].faces.len()
    }

    /// Whether an edge has a single recorded face.
    #[inline]
    pub fn is_boundary_edge(&self, id: EdgeId) -> bool {
        self.edges[id.index()].is_boundary()
    }

    /// Number of boundary edges.
    pub fn boundary_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_boundary()).count()
    }

    /// Deduplicated element counts.
    pub fn stats(&self) -> MeshStats {
        let quads = self.faces.iter().filter(|f| f.is_quad).count();
        MeshStats {
            vertices: self.num_vertices(),
            edges: self.num_edges(),
            boundary_edges: self.boundary_edge_count(),
            triangles: self.num_faces() - quads,
            quads,
        }
    }
}

#[inline]
fn sorted_pair(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Face;

    fn p(x: f64, y: f64, z: f64) -> Point3<f64> {
        Point3::new(x, y, z)
    }

    fn two_quads() -> Mesh {
        let vertices = vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(2.0, 1.0, 0.0),
        ];
        Mesh::from_polygons(vertices, &[[0usize, 1, 2, 3], [1, 4, 5, 2]]).unwrap()
    }

    /// Same geometry as `two_quads`, but every face owns its own corners.
    fn two_quads_unshared() -> Mesh {
        let mut mesh = Mesh::new();
        let source = two_quads();
        for face in &source.faces {
            let base = mesh.num_vertices();
            for &vi in face.indices() {
                mesh.add_vertex(source.vertices[vi]);
            }
            mesh.add_face(Face::Quad([base, base + 1, base + 2, base + 3]));
        }
        mesh
    }

    #[test]
    fn test_counts_two_quads() {
        let topology = Topology::from_mesh(&two_quads()).unwrap();
        assert_eq!(topology.num_vertices(), 6);
        assert_eq!(topology.num_edges(), 7);
        assert_eq!(topology.num_faces(), 2);
        assert_eq!(topology.boundary_edge_count(), 6);
    }

    #[test]
    fn test_first_seen_numbering() {
        let topology = Topology::from_mesh(&two_quads()).unwrap();

        // Vertices in scan order: 0 1 2 3 from face 0, then 4 5 from face 1.
        assert_eq!(*topology.position(VertexId::new(4)), p(2.0, 0.0, 0.0));
        assert_eq!(*topology.position(VertexId::new(5)), p(2.0, 1.0, 0.0));

        // Face 0 sides: (0,1) (1,2) (2,3) (3,0) -> E0..E3.
        let f0 = topology.face(FaceId::new(0));
        assert_eq!(f0.sides(), &[EdgeId::new(0), EdgeId::new(1), EdgeId::new(2), EdgeId::new(3)]);

        // Face 1 sides: (1,4) new, (4,5) new, (5,2) new, (2,1) reuses E1.
        let f1 = topology.face(FaceId::new(1));
        assert_eq!(f1.sides(), &[EdgeId::new(4), EdgeId::new(5), EdgeId::new(6), EdgeId::new(1)]);
    }

    #[test]
    fn test_edge_endpoints_are_sorted() {
        let topology = Topology::from_mesh(&two_quads()).unwrap();
        for edge in topology.edges() {
            assert!(edge.low < edge.high);
        }
        // (3,0) is stored as (0,3).
        let e3 = topology.edge(EdgeId::new(3));
        assert_eq!((e3.low, e3.high), (VertexId::new(0), VertexId::new(3)));
    }

    #[test]
    fn test_face_sides_follow_corners() {
        let topology = Topology::from_mesh(&two_quads()).unwrap();
        for face in topology.faces() {
            let corners = face.corners();
            let n = corners.len();
            assert_eq!(face.sides().len(), n);
            for (i, &e) in face.sides().iter().enumerate() {
                assert_eq!(topology.find_edge(corners[i], corners[(i + 1) % n]), Some(e));
            }
        }
    }

    #[test]
    fn test_shared_edge_is_interior() {
        let topology = Topology::from_mesh(&two_quads()).unwrap();
        let shared = topology
            .find_edge(VertexId::new(1), VertexId::new(2))
            .unwrap();
        let edge = topology.edge(shared);
        assert_eq!(edge.face_count, 2);
        assert_eq!(edge.incident_faces(), &[FaceId::new(0), FaceId::new(1)]);
        assert!(!topology.is_boundary_edge(shared));
    }

    #[test]
    fn test_vertex_incidence_lists() {
        let topology = Topology::from_mesh(&two_quads()).unwrap();
        let v1 = topology.vertex(VertexId::new(1));
        assert_eq!(v1.faces, vec![FaceId::new(0), FaceId::new(1)]);
        // One entry per face side: E0, E1 from face 0 and E4, E1 from face 1.
        assert_eq!(
            v1.edges,
            vec![EdgeId::new(0), EdgeId::new(1), EdgeId::new(4), EdgeId::new(1)]
        );
        assert_eq!(topology.valence(VertexId::new(1)), 2);
        assert_eq!(topology.valence(VertexId::new(0)), 1);
    }

    #[test]
    fn test_duplicate_positions_are_merged() {
        let shared = Topology::from_mesh(&two_quads()).unwrap();
        let unshared = Topology::from_mesh(&two_quads_unshared()).unwrap();

        assert_eq!(shared.positions(), unshared.positions());
        assert_eq!(shared.num_edges(), unshared.num_edges());
        for (a, b) in shared.edges().iter().zip(unshared.edges()) {
            assert_eq!((a.low, a.high), (b.low, b.high));
            assert_eq!(a.incident_faces(), b.incident_faces());
        }
        for (a, b) in shared.faces().iter().zip(unshared.faces()) {
            assert_eq!(a.corners(), b.corners());
            assert_eq!(a.sides(), b.sides());
        }
    }

    #[test]
    fn test_triangle_face_record() {
        let vertices = vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)];
        let mesh = Mesh::from_polygons(vertices, &[[0usize, 1, 2]]).unwrap();
        let topology = Topology::from_mesh(&mesh).unwrap();

        let face = topology.face(FaceId::new(0));
        assert!(!face.is_quad);
        assert_eq!(face.corner_count(), 3);
        assert!(!face.vertices[3].is_valid());
        assert!(!face.edges[3].is_valid());
        assert_eq!(topology.boundary_edge_count(), 3);
    }

    #[test]
    fn test_non_manifold_edge_saturates() {
        // Three triangles fanning around the edge (0,1).
        let vertices = vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.5, 1.0, 0.0),
            p(0.5, -1.0, 0.0),
            p(0.5, 0.0, 1.0),
        ];
        let mesh =
            Mesh::from_polygons(vertices, &[[0usize, 1, 2], [1, 0, 3], [0, 1, 4]]).unwrap();
        let topology = Topology::from_mesh(&mesh).unwrap();

        let e = topology.find_edge(VertexId::new(0), VertexId::new(1)).unwrap();
        let edge = topology.edge(e);
        assert_eq!(edge.face_count, 2);
        assert_eq!(edge.incident_faces(), &[FaceId::new(0), FaceId::new(1)]);

        // The third face still references the edge.
        assert!(topology.face(FaceId::new(2)).sides().contains(&e));
        // And its corners still record the face.
        assert_eq!(topology.valence(VertexId::new(0)), 3);
    }

    #[test]
    fn test_move_vertex_rekeys() {
        let mut topology = Topology::from_mesh(&two_quads()).unwrap();
        let v = VertexId::new(0);

        topology.move_vertex(v, p(-1.0, -1.0, 0.0)).unwrap();
        assert_eq!(*topology.position(v), p(-1.0, -1.0, 0.0));
        assert_eq!(topology.find_vertex(&p(-1.0, -1.0, 0.0)), Some(v));
        assert_eq!(topology.find_vertex(&p(0.0, 0.0, 0.0)), None);
    }

    #[test]
    fn test_move_vertex_onto_itself() {
        let mut topology = Topology::from_mesh(&two_quads()).unwrap();
        let v = VertexId::new(2);
        topology.move_vertex(v, p(1.0, 1.0, 0.0)).unwrap();
        assert_eq!(topology.find_vertex(&p(1.0, 1.0, 0.0)), Some(v));
    }

    #[test]
    fn test_move_vertex_collision() {
        let mut topology = Topology::from_mesh(&two_quads()).unwrap();
        let err = topology
            .move_vertex(VertexId::new(0), p(1.0, 0.0, 0.0))
            .unwrap_err();
        assert!(matches!(
            err,
            MeshError::TopologyCollision { vertex, other }
                if vertex == VertexId::new(0) && other == VertexId::new(1)
        ));

        // Nothing changed.
        assert_eq!(*topology.position(VertexId::new(0)), p(0.0, 0.0, 0.0));
        assert_eq!(topology.find_vertex(&p(0.0, 0.0, 0.0)), Some(VertexId::new(0)));
        assert_eq!(topology.find_vertex(&p(1.0, 0.0, 0.0)), Some(VertexId::new(1)));
    }

    #[test]
    fn test_move_onto_unmoved_vertex_collides() {
        // Exchanging two positions one move at a time hits the vertex that
        // has not moved yet.
        let mut topology = Topology::from_mesh(&two_quads()).unwrap();
        let target = *topology.position(VertexId::new(1));

        let err = topology.move_vertex(VertexId::new(0), target).unwrap_err();
        assert!(matches!(
            err,
            MeshError::TopologyCollision { vertex, other }
                if vertex == VertexId::new(0) && other == VertexId::new(1)
        ));
        assert_eq!(topology.find_vertex(&p(0.0, 0.0, 0.0)), Some(VertexId::new(0)));
        assert_eq!(topology.find_vertex(&target), Some(VertexId::new(1)));
    }

    #[test]
    fn test_invalid_index_is_rejected() {
        let mesh = Mesh {
            vertices: vec![p(0.0, 0.0, 0.0); 3],
            faces: vec![Face::Triangle([0, 1, 3])],
        };
        let err = Topology::from_mesh(&mesh).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_stats() {
        let topology = Topology::from_mesh(&two_quads_unshared()).unwrap();
        let stats = topology.stats();
        assert_eq!(
            stats,
            MeshStats {
                vertices: 6,
                edges: 7,
                boundary_edges: 6,
                triangles: 0,
                quads: 2,
            }
        );
    }
}
