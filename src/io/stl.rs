//! STL export of meshed shapes.
//!
//! Two layouts are produced: one combined file holding every shape, and a
//! tagged per-material layout with one file per shape name so downstream
//! neutronics tooling can assign materials by file name.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

use stl_io::{Normal, Triangle, Vertex, write_stl};
use tracing::info;

use crate::kernel::meshing::TriMesh;
use crate::shape::Shape;

use super::IoError;

/// Renders `mesh` as an ASCII STL solid with the given `name`.
pub fn to_stl_ascii(mesh: &TriMesh, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {name}\n"));

    for tri in &mesh.triangles {
        let n = tri[0].normal;
        out.push_str(&format!(
            "  facet normal {:.6} {:.6} {:.6}\n",
            n.x, n.y, n.z
        ));
        out.push_str("    outer loop\n");
        for v in tri {
            let p = v.position;
            out.push_str(&format!(
                "      vertex {:.6} {:.6} {:.6}\n",
                p.x, p.y, p.z
            ));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    out.push_str(&format!("endsolid {name}\n"));
    out
}

/// Renders `mesh` as a binary STL byte vector.
pub fn to_stl_binary(mesh: &TriMesh) -> std::io::Result<Vec<u8>> {
    let triangles: Vec<Triangle> = mesh
        .triangles
        .iter()
        .map(|tri| Triangle {
            normal: {
                let n = tri[0].normal;
                Normal::new([n.x as f32, n.y as f32, n.z as f32])
            },
            vertices: tri.map(|v| {
                let p = v.position;
                Vertex::new([p.x as f32, p.y as f32, p.z as f32])
            }),
        })
        .collect();

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

/// Meshes every shape at `resolution` and writes one combined binary STL to
/// `path`.
pub fn write_combined_stl(
    path: impl AsRef<Path>,
    shapes: &[Shape],
    resolution: (usize, usize, usize),
) -> Result<(), IoError> {
    let mut combined = TriMesh::default();
    for shape in shapes {
        let mesh = shape.solid().surface_mesh(resolution)?;
        info!(
            name = shape.name(),
            triangles = mesh.triangles.len(),
            "meshed shape"
        );
        combined.extend_from(&mesh);
    }
    std::fs::write(path.as_ref(), to_stl_binary(&combined)?)?;
    info!(path = %path.as_ref().display(), "wrote combined STL");
    Ok(())
}

/// Meshes the shapes at `resolution` and writes one binary STL per distinct
/// shape name into `dir` (created if absent). Shapes sharing a name are
/// merged into one file; names listed in `exclude` are skipped.
pub fn write_tagged_stl(
    dir: impl AsRef<Path>,
    shapes: &[Shape],
    resolution: (usize, usize, usize),
    exclude: &[&str],
) -> Result<(), IoError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut by_name: BTreeMap<&str, TriMesh> = BTreeMap::new();
    for shape in shapes {
        if exclude.contains(&shape.name()) {
            continue;
        }
        let mesh = shape.solid().surface_mesh(resolution)?;
        by_name
            .entry(shape.name())
            .or_default()
            .extend_from(&mesh);
    }

    for (name, mesh) in &by_name {
        let path = dir.join(format!("{name}.stl"));
        std::fs::write(&path, to_stl_binary(mesh)?)?;
        info!(path = %path.display(), triangles = mesh.triangles.len(), "wrote tagged STL");
    }
    Ok(())
}
