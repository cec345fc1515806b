//! Catmull-Clark subdivision for triangle/quad meshes.

use log::{debug, trace, warn};
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::algo::progress::{Progress, Stage};
use crate::error::Result;
use crate::mesh::{Face, Mesh, Topology, VertexId};

use super::SubdivideOptions;

/// Performs Catmull-Clark subdivision on a triangle/quad mesh.
///
/// The input mesh is not modified; the subdivided mesh is returned. Each
/// pass turns every face into one quad per corner, so a quad becomes four
/// quads and a triangle becomes three.
///
/// # Arguments
///
/// * `mesh` - The mesh to subdivide
/// * `options` - Subdivision parameters
///
/// # Algorithm
///
/// For each iteration:
/// 1. Build the adjacency model (merging coincident vertices)
/// 2. Compute face points (centroid of each face)
/// 3. Compute edge points (midpoint on boundary edges, otherwise the average
///    of both endpoints and both adjacent face points)
/// 4. Move original vertices using the weighted average below
/// 5. Emit one quad per original corner
///
/// # Vertex Rule
///
/// `((n - 3) S + Q + 2R) / n` where:
/// - Q = average of adjacent face points
/// - R = average of adjacent edge midpoints
/// - S = original position
/// - n = number of adjacent faces
///
/// # Errors
///
/// Returns [`MeshError::InvalidVertexIndex`](crate::error::MeshError::InvalidVertexIndex)
/// if the input references missing vertices, and
/// [`MeshError::TopologyCollision`](crate::error::MeshError::TopologyCollision)
/// if two vertices are driven to the same position. No partial result is
/// returned.
///
/// # Example
///
/// ```
/// use quadsmooth::algo::subdivide::{catmull_clark_subdivide, SubdivideOptions};
/// use quadsmooth::mesh::Mesh;
/// use nalgebra::Point3;
///
/// // A tetrahedron.
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
///     Point3::new(0.5, 0.5, 1.0),
/// ];
/// let faces = [[0usize, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
/// let mesh = Mesh::from_polygons(vertices, &faces).unwrap();
///
/// let refined = catmull_clark_subdivide(&mesh, &SubdivideOptions::new(1)).unwrap();
/// assert_eq!(refined.num_quads(), 12);
/// ```
pub fn catmull_clark_subdivide(mesh: &Mesh, options: &SubdivideOptions) -> Result<Mesh> {
    catmull_clark_subdivide_with_progress(mesh, options, &Progress::none())
}

/// Catmull-Clark subdivision with progress reporting.
pub fn catmull_clark_subdivide_with_progress(
    mesh: &Mesh,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<Mesh> {
    mesh.validate()?;

    let mut current = mesh.clone();
    if options.iterations == 0 {
        return Ok(current);
    }

    for iter in 0..options.iterations {
        let faces_before = current.num_faces();
        current = subdivide_pass(&current, options.parallel, |stage| {
            trace!("Catmull-Clark pass {}: {}", iter + 1, stage.label());
            progress.report_stage(iter, options.iterations, stage);
        })
        .inspect_err(|e| warn!("Catmull-Clark pass {} failed: {}", iter + 1, e))?;

        debug!(
            "Catmull-Clark pass {}/{}: {} faces -> {} quads",
            iter + 1,
            options.iterations,
            faces_before,
            current.num_faces()
        );
    }
    progress.report_done(options.iterations);

    Ok(current)
}

/// Perform one Catmull-Clark pass on an already built adjacency model.
///
/// The model is consumed: original vertices are repositioned inside it
/// before the refined mesh is emitted.
pub fn subdivide_once(topology: Topology, parallel: bool) -> Result<Mesh> {
    subdivide_topology(topology, parallel, |_| {})
}

fn subdivide_pass<F: FnMut(Stage)>(mesh: &Mesh, parallel: bool, mut on_stage: F) -> Result<Mesh> {
    on_stage(Stage::Topology);
    let topology = Topology::from_mesh(mesh)?;
    subdivide_topology(topology, parallel, on_stage)
}

fn subdivide_topology<F: FnMut(Stage)>(
    mut topology: Topology,
    parallel: bool,
    mut on_stage: F,
) -> Result<Mesh> {
    // Step 1: Face points (centroids)
    on_stage(Stage::FacePoints);
    let face_points = face_points(&topology, parallel);

    // Step 2: Edge points
    on_stage(Stage::EdgePoints);
    let edge_points = edge_points(&topology, &face_points, parallel);

    // Step 3: Reposition original vertices, all from pre-move positions.
    // Moves are applied in index order; landing on a vertex that has not
    // moved yet is a collision.
    on_stage(Stage::VertexPoints);
    let vertex_points = vertex_points(&topology, &face_points, parallel);
    for (vi, position) in vertex_points.into_iter().enumerate() {
        topology.move_vertex(VertexId::new(vi), position)?;
    }

    // Step 4: Emit the refined quads
    on_stage(Stage::Retessellate);
    Ok(retessellate(&topology, &face_points, &edge_points))
}

/// Compute one face point per face: the mean of its corners.
pub fn face_points(topology: &Topology, parallel: bool) -> Vec<Point3<f64>> {
    collect_indexed(topology.num_faces(), parallel, |fi| {
        let corners = topology.faces()[fi].corners();
        let sum: Vector3<f64> = corners.iter().map(|&v| topology.position(v).coords).sum();
        Point3::from(sum / corners.len() as f64)
    })
}

/// Compute one edge point per edge.
///
/// Boundary edges get their midpoint; interior edges get
/// `0.25 * (P0 + P1 + F0 + F1)`.
pub fn edge_points(
    topology: &Topology,
    face_points: &[Point3<f64>],
    parallel: bool,
) -> Vec<Point3<f64>> {
    collect_indexed(topology.num_edges(), parallel, |ei| {
        let edge = &topology.edges()[ei];
        let p0 = topology.position(edge.low).coords;
        let p1 = topology.position(edge.high).coords;

        if edge.is_boundary() {
            Point3::from((p0 + p1) * 0.5)
        } else {
            let f0 = face_points[edge.faces[0].index()].coords;
            let f1 = face_points[edge.faces[1].index()].coords;
            Point3::from((p0 + p1 + f0 + f1) * 0.25)
        }
    })
}

/// Compute the repositioned location of every original vertex.
///
/// Reads the model's current positions only, so the result does not depend
/// on the order in which the moves are later applied.
pub fn vertex_points(
    topology: &Topology,
    face_points: &[Point3<f64>],
    parallel: bool,
) -> Vec<Point3<f64>> {
    collect_indexed(topology.num_vertices(), parallel, |vi| {
        let record = topology.vertex(VertexId::new(vi));
        let n = record.faces.len() as f64;
        let m1 = (n - 3.0) / n;
        let m2 = 1.0 / n;
        let m3 = 2.0 / n;

        // Q = average of adjacent face points
        let avg_face: Vector3<f64> = record
            .faces
            .iter()
            .map(|f| face_points[f.index()].coords)
            .sum::<Vector3<f64>>()
            / n;

        // R = average of adjacent edge midpoints
        let avg_edge_mid: Vector3<f64> = record
            .edges
            .iter()
            .map(|&e| {
                let edge = topology.edge(e);
                (topology.position(edge.low).coords + topology.position(edge.high).coords) * 0.5
            })
            .sum::<Vector3<f64>>()
            / record.edges.len() as f64;

        Point3::from(record.position.coords * m1 + avg_face * m2 + avg_edge_mid * m3)
    })
}

/// Build the refined mesh from repositioned corners and the new points.
///
/// For every face the output gets its corners, then its edge points in
/// side order, then its face point. Nothing is shared between faces; the
/// next adjacency build merges the duplicates again. Each corner yields the
/// quad `(previous edge point, corner, next edge point, face point)`.
pub fn retessellate(
    topology: &Topology,
    face_points: &[Point3<f64>],
    edge_points: &[Point3<f64>],
) -> Mesh {
    let corner_total: usize = topology.faces().iter().map(|f| f.corner_count()).sum();
    let mut mesh = Mesh::with_capacity(corner_total * 2 + topology.num_faces(), corner_total);

    for (fi, face) in topology.faces().iter().enumerate() {
        let n = face.corner_count();
        let base = mesh.num_vertices();

        for &v in face.corners() {
            mesh.add_vertex(*topology.position(v));
        }
        for &e in face.sides() {
            mesh.add_vertex(edge_points[e.index()]);
        }
        let center = mesh.add_vertex(face_points[fi]);

        for i in 0..n {
            let corner = base + i;
            let next_edge = base + n + i;
            let prev_edge = base + n + (i + n - 1) % n;
            mesh.add_face(Face::Quad([prev_edge, corner, next_edge, center]));
        }
    }

    mesh
}

/// Map `0..n` through `f`, keeping index order whether or not it runs in parallel.
fn collect_indexed<T, F>(n: usize, parallel: bool, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Send + Sync,
{
    if parallel {
        (0..n).into_par_iter().map(f).collect()
    } else {
        (0..n).map(f).collect()
    }
}
