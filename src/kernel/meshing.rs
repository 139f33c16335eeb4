//! Surface-nets triangulation of a solid.
//!
//! The solid's signed-distance field is sampled on a regular grid over a
//! padded bounding box and passed through `fast_surface_nets`. The grid is
//! padded by a couple of cells so the isosurface never touches the sampling
//! boundary, which would truncate the mesh.

use fast_surface_nets::{SurfaceNetsBuffer, surface_nets};
use nalgebra::{Point3, Vector3};

use super::{Solid, sdf};
use crate::errors::BuildError;
use crate::float_types::Real;

/// A mesh vertex: position plus (unit) surface normal.
#[derive(Debug, Clone, Copy)]
pub struct MeshVertex {
    pub position: Point3<Real>,
    pub normal: Vector3<Real>,
}

/// A triangle soup produced by [`surface_mesh`].
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    pub triangles: Vec<[MeshVertex; 3]>,
}

impl TriMesh {
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Appends all triangles of `other`.
    pub fn extend_from(&mut self, other: &TriMesh) {
        self.triangles.extend_from_slice(&other.triangles);
    }
}

/// The shape describing our discrete grid for surface nets.
#[derive(Clone, Copy)]
struct GridShape {
    nx: u32,
    ny: u32,
    nz: u32,
}

impl fast_surface_nets::ndshape::Shape<3> for GridShape {
    type Coord = u32;

    #[inline]
    fn as_array(&self) -> [Self::Coord; 3] {
        [self.nx, self.ny, self.nz]
    }

    fn size(&self) -> Self::Coord {
        self.nx * self.ny * self.nz
    }

    fn usize(&self) -> usize {
        (self.nx * self.ny * self.nz) as usize
    }

    fn linearize(&self, coords: [Self::Coord; 3]) -> u32 {
        let [x, y, z] = coords;
        (z * self.ny + y) * self.nx + x
    }

    fn delinearize(&self, i: u32) -> [Self::Coord; 3] {
        let x = i % self.nx;
        let yz = i / self.nx;
        let y = yz % self.ny;
        let z = yz / self.ny;
        [x, y, z]
    }
}

/// Triangulates `solid` on a grid of the given resolution (clamped to a
/// minimum of 2 samples per axis). Fails with
/// [`BuildError::Kernel`] when the solid has no finite bounding box.
pub fn surface_mesh(
    solid: &Solid,
    resolution: (usize, usize, usize),
) -> Result<TriMesh, BuildError> {
    let nx = resolution.0.max(2) as u32;
    let ny = resolution.1.max(2) as u32;
    let nz = resolution.2.max(2) as u32;

    let aabb = solid.bounding_box();
    let mins = aabb.mins;
    let maxs = aabb.maxs;
    if !(mins.coords.iter().all(|c| c.is_finite())
        && maxs.coords.iter().all(|c| c.is_finite()))
    {
        return Err(BuildError::Kernel(
            "cannot mesh a solid with a non-finite bounding box".into(),
        ));
    }

    // Pad by two cells per side so the surface stays interior to the grid.
    let extent = maxs - mins;
    let pad = Vector3::new(
        (extent.x / nx as Real).max(1e-3) * 2.0,
        (extent.y / ny as Real).max(1e-3) * 2.0,
        (extent.z / nz as Real).max(1e-3) * 2.0,
    );
    let min_pt = mins - pad;
    let max_pt = maxs + pad;

    let dx = (max_pt.x - min_pt.x) / (nx as Real - 1.0);
    let dy = (max_pt.y - min_pt.y) / (ny as Real - 1.0);
    let dz = (max_pt.z - min_pt.z) / (nz as Real - 1.0);

    // Sample the SDF at each grid node.
    let mut field_values = vec![0.0_f32; (nx * ny * nz) as usize];
    field_values.iter_mut().enumerate().for_each(|(i, value)| {
        let iz = i / (nx * ny) as usize;
        let remainder = i % (nx * ny) as usize;
        let iy = remainder / nx as usize;
        let ix = remainder % nx as usize;

        let p = Point3::new(
            min_pt.x + (ix as Real) * dx,
            min_pt.y + (iy as Real) * dy,
            min_pt.z + (iz as Real) * dz,
        );
        let d = sdf::distance(solid, &p);
        *value = if d.is_finite() { d as f32 } else { 1e10_f32 };
    });

    let shape = GridShape { nx, ny, nz };
    let mut sn_buffer = SurfaceNetsBuffer::default();
    surface_nets(
        &field_values,
        &shape,
        [0, 0, 0],
        [nx - 1, ny - 1, nz - 1],
        &mut sn_buffer,
    );

    let triangles: Vec<[MeshVertex; 3]> = sn_buffer
        .indices
        .chunks_exact(3)
        .filter_map(|tri| {
            let vertex = |idx: u32| -> Option<MeshVertex> {
                let i = idx as usize;
                let pos = sn_buffer.positions[i];
                let nrm = sn_buffer.normals[i];
                let position = Point3::new(
                    min_pt.x + pos[0] as Real * dx,
                    min_pt.y + pos[1] as Real * dy,
                    min_pt.z + pos[2] as Real * dz,
                );
                let normal = Vector3::new(nrm[0] as Real, nrm[1] as Real, nrm[2] as Real);
                if !(position.coords.iter().all(|c| c.is_finite())
                    && normal.iter().all(|c| c.is_finite()))
                {
                    return None;
                }
                let normal = if normal.norm() > 0.0 {
                    normal.normalize()
                } else {
                    normal
                };
                Some(MeshVertex { position, normal })
            };
            Some([vertex(tri[0])?, vertex(tri[1])?, vertex(tri[2])?])
        })
        .collect();

    Ok(TriMesh { triangles })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_meshes_to_a_closed_surface_near_its_box() {
        let mesh = Solid::cuboid(2.0, 2.0, 2.0)
            .surface_mesh((24, 24, 24))
            .unwrap();
        assert!(!mesh.is_empty());
        for tri in &mesh.triangles {
            for v in tri {
                // vertices must sit near the unit-ish cube surface
                assert!(v.position.coords.amax() < 1.5);
            }
        }
    }

    #[test]
    fn annulus_meshes_without_failure() {
        let annulus = Solid::cylinder(2.0, 1.0).difference(&Solid::cylinder(1.0, 2.0));
        let mesh = annulus.surface_mesh((32, 32, 16)).unwrap();
        assert!(!mesh.is_empty());
    }
}
