//! Wavefront OBJ format support.
//!
//! Only vertex positions and polygon faces are read; texture coordinates,
//! normals, materials, points and lines are ignored. Faces must be
//! triangles or quads.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;
use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{Face, Mesh};

/// Load a mesh from an OBJ file.
///
/// All objects and groups in the file are merged into one mesh.
///
/// # Example
///
/// ```no_run
/// use quadsmooth::io::obj;
///
/// let mesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let options = tobj::LoadOptions {
        single_index: false,
        triangulate: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };

    let (models, _materials) = tobj::load_obj(path, &options).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut mesh = Mesh::new();
    for model in &models {
        let data = &model.mesh;
        let base = mesh.num_vertices();

        for p in data.positions.chunks_exact(3) {
            mesh.add_vertex(Point3::new(p[0] as f64, p[1] as f64, p[2] as f64));
        }

        // An empty arity list means every face is a triangle.
        let arities: Vec<usize> = if data.face_arities.is_empty() {
            vec![3; data.indices.len() / 3]
        } else {
            data.face_arities.iter().map(|&a| a as usize).collect()
        };

        let mut start = 0;
        for arity in arities {
            let corners: Vec<usize> = data.indices[start..start + arity]
                .iter()
                .map(|&i| base + i as usize)
                .collect();
            start += arity;

            let face = Face::from_slice(&corners).ok_or(MeshError::InvalidFaceArity {
                face: mesh.num_faces(),
                corners: arity,
            })?;
            mesh.add_face(face);
        }
    }

    mesh.validate()?;
    debug!(
        "loaded {}: {} vertices, {} faces from {} object(s)",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces(),
        models.len()
    );
    Ok(mesh)
}

/// Save a mesh to an OBJ file.
///
/// Faces are written with their original corner counts.
///
/// # Example
///
/// ```no_run
/// use quadsmooth::io::obj;
/// use quadsmooth::mesh::Mesh;
///
/// let mesh = Mesh::new();
/// obj::save(&mesh, "output.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_to(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh in OBJ syntax to any writer.
pub fn write_to<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<()> {
    writeln!(writer, "# Generated by quadsmooth")?;
    writeln!(
        writer,
        "# {} vertices, {} faces",
        mesh.num_vertices(),
        mesh.num_faces()
    )?;

    for v in &mesh.vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }

    for face in &mesh.faces {
        write!(writer, "f")?;
        for &i in face.indices() {
            write!(writer, " {}", i + 1)?;
        }
        writeln!(writer)?;
    }

    Ok(())
}
