//! STL (stereolithography) format support.
//!
//! STL only stores triangles. Loading yields a triangle mesh; saving splits
//! every quad along its first diagonal.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::debug;
use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{Face, Mesh};

/// Load a mesh from an STL file.
///
/// Automatically detects binary vs ASCII format. Identical vertex positions
/// are shared and degenerate triangles are skipped.
///
/// # Example
///
/// ```no_run
/// use quadsmooth::io::stl;
///
/// let mesh = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let stl = stl_io::read_stl(&mut file).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let vertices: Vec<Point3<f64>> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();

    let mut mesh = Mesh::with_capacity(vertices.len(), stl.faces.len());
    mesh.vertices = vertices;

    let mut skipped = 0;
    for tri in &stl.faces {
        let [i0, i1, i2] = tri.vertices;
        if i0 != i1 && i1 != i2 && i0 != i2 {
            mesh.add_face(Face::Triangle([i0, i1, i2]));
        } else {
            skipped += 1;
        }
    }

    if mesh.num_faces() == 0 {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "STL file contains no valid triangles".to_string(),
        });
    }

    mesh.validate()?;
    debug!(
        "loaded {}: {} vertices, {} triangles ({} degenerate skipped)",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces(),
        skipped
    );
    Ok(mesh)
}

/// Save a mesh to a binary STL file.
///
/// Quads `[a, b, c, d]` are written as the triangles `[a, b, c]` and
/// `[a, c, d]`.
///
/// # Example
///
/// ```no_run
/// use quadsmooth::io::stl;
/// use quadsmooth::mesh::Mesh;
///
/// let mesh = Mesh::new();
/// stl::save(&mesh, "output.stl").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    mesh.validate()?;

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let triangles: Vec<stl_io::Triangle> = triangulate(mesh)
        .iter()
        .map(|&[a, b, c]| {
            let p0 = &mesh.vertices[a];
            let p1 = &mesh.vertices[b];
            let p2 = &mesh.vertices[c];

            let n = (p1 - p0)
                .cross(&(p2 - p0))
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(Vector3::zeros);

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [to_stl_vertex(p0), to_stl_vertex(p1), to_stl_vertex(p2)],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}

fn to_stl_vertex(p: &Point3<f64>) -> stl_io::Vertex {
    stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32])
}

/// Split every face into triangles, keeping corner order.
fn triangulate(mesh: &Mesh) -> Vec<[usize; 3]> {
    let mut triangles = Vec::with_capacity(mesh.num_triangles() + 2 * mesh.num_quads());
    for face in &mesh.faces {
        match *face {
            Face::Triangle(tri) => triangles.push(tri),
            Face::Quad([a, b, c, d]) => {
                triangles.push([a, b, c]);
                triangles.push([a, c, d]);
            }
        }
    }
    triangles
}
