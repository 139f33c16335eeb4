//! The solid-modeling kernel consumed by the divertor builders.
//!
//! [`Solid`] is an opaque, value-semantic handle: every boolean or transform
//! operation returns a new handle and no solid is ever mutated in place.
//! Internally a solid is an immutable CSG expression tree of primitives,
//! unions, differences and rigid transforms, evaluated on demand as a
//! signed-distance field ([`sdf`]) and triangulated with surface nets
//! ([`meshing`]). Sharing is by `Arc`, so cloning a handle is cheap and a
//! replica of an expensive assembly is a transform node, not a rebuild.
//!
//! Booleans on this representation are total; the failure surface of the
//! kernel is evaluation and meshing, which report
//! [`BuildError::Kernel`](crate::errors::BuildError::Kernel).

pub mod meshing;
pub mod sdf;

use std::sync::Arc;

use nalgebra::{Isometry3, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};

use crate::errors::BuildError;
use crate::float_types::parry3d::bounding_volume::{Aabb, BoundingVolume};
use crate::float_types::{FRAC_PI_2, Real};

pub use meshing::{MeshVertex, TriMesh};

/// Opaque handle to an immutable solid.
#[derive(Debug, Clone)]
pub struct Solid {
    node: Arc<Node>,
}

#[derive(Debug)]
pub(crate) enum Node {
    /// Cylinder of the given radius, axis Z, centered at the origin,
    /// spanning `[-height/2, height/2]`.
    Cylinder { radius: Real, height: Real },
    /// Axis-aligned box centered at the origin.
    Cuboid { x: Real, y: Real, z: Real },
    /// Circular profile revolved about the Z axis through the origin:
    /// the tube center arc has radius `ring_radius` in the XY plane,
    /// starts at `(-ring_radius, 0, 0)` with tangent `+Y`, and sweeps
    /// `sweep` radians (flat end caps). Valid for `0 < sweep <= π`.
    TorusSegment {
        ring_radius: Real,
        tube_radius: Real,
        sweep: Real,
    },
    Union(Solid, Solid),
    Difference(Solid, Solid),
    Transform { iso: Isometry3<Real>, inner: Solid },
}

impl Solid {
    fn from_node(node: Node) -> Self {
        Self {
            node: Arc::new(node),
        }
    }

    pub(crate) fn node(&self) -> &Node {
        &self.node
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    /// Cylinder centered at the origin with its axis along Z.
    pub fn cylinder(radius: Real, height: Real) -> Self {
        Self::from_node(Node::Cylinder { radius, height })
    }

    /// Cylinder spanning `[0, length]` along the Y axis: the extrusion of a
    /// circular profile along the straight run of a cooling path.
    pub fn cylinder_along_y(radius: Real, length: Real) -> Self {
        Self::cylinder(radius, length)
            .rotate(-90.0, 0.0, 0.0)
            .translate(0.0, length / 2.0, 0.0)
    }

    /// Axis-aligned box centered at the origin.
    pub fn cuboid(x: Real, y: Real, z: Real) -> Self {
        Self::from_node(Node::Cuboid { x, y, z })
    }

    /// Circular profile revolved `sweep` radians about the Z axis; see
    /// [`Node::TorusSegment`] for the canonical placement.
    pub fn torus_segment(ring_radius: Real, tube_radius: Real, sweep: Real) -> Self {
        Self::from_node(Node::TorusSegment {
            ring_radius,
            tube_radius,
            sweep,
        })
    }

    // ------------------------------------------------------------------
    // Booleans
    // ------------------------------------------------------------------

    /// Boolean union. Returns a new solid; neither input is modified.
    pub fn union(&self, other: &Solid) -> Solid {
        Self::from_node(Node::Union(self.clone(), other.clone()))
    }

    /// Boolean cut (`self` minus `other`). Returns a new solid.
    pub fn difference(&self, other: &Solid) -> Solid {
        Self::from_node(Node::Difference(self.clone(), other.clone()))
    }

    // ------------------------------------------------------------------
    // Rigid transforms
    // ------------------------------------------------------------------

    /// Applies a rigid transform. Consecutive transforms collapse into one
    /// node rather than growing the tree.
    pub fn transform(&self, iso: &Isometry3<Real>) -> Solid {
        match self.node() {
            Node::Transform { iso: prior, inner } => Self::from_node(Node::Transform {
                iso: iso * prior,
                inner: inner.clone(),
            }),
            _ => Self::from_node(Node::Transform {
                iso: *iso,
                inner: self.clone(),
            }),
        }
    }

    /// Returns a new solid translated by x, y, and z.
    pub fn translate(&self, x: Real, y: Real, z: Real) -> Solid {
        self.translate_vector(Vector3::new(x, y, z))
    }

    /// Returns a new solid translated by vector.
    pub fn translate_vector(&self, vector: Vector3<Real>) -> Solid {
        self.transform(&Isometry3::from_parts(
            Translation3::from(vector),
            UnitQuaternion::identity(),
        ))
    }

    /// Rotates the solid by x_degrees, y_degrees, z_degrees about the origin.
    pub fn rotate(&self, x_deg: Real, y_deg: Real, z_deg: Real) -> Solid {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), x_deg.to_radians());
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), y_deg.to_radians());
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), z_deg.to_radians());
        let rot = rz * ry * rx;
        self.transform(&Isometry3::from_parts(
            Translation3::identity(),
            UnitQuaternion::from_rotation_matrix(&rot),
        ))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Conservative axis-aligned bounding box.
    pub fn bounding_box(&self) -> Aabb {
        match self.node() {
            Node::Cylinder { radius, height } => {
                let h2 = height / 2.0;
                Aabb::new(
                    Point3::new(-radius, -radius, -h2),
                    Point3::new(*radius, *radius, h2),
                )
            },
            Node::Cuboid { x, y, z } => Aabb::new(
                Point3::new(-x / 2.0, -y / 2.0, -z / 2.0),
                Point3::new(x / 2.0, y / 2.0, z / 2.0),
            ),
            Node::TorusSegment {
                ring_radius,
                tube_radius,
                sweep,
            } => {
                let (r, t) = (*ring_radius, *tube_radius);
                // Arc angles span [π - sweep, π]; x is widest at the start
                // cap, y at either the start cap or the top of the arc.
                let x_max = -r * sweep.cos() + t;
                let y_max = t + if *sweep >= FRAC_PI_2 { r } else { r * sweep.sin() };
                Aabb::new(
                    Point3::new(-r - t, 0.0, -t),
                    Point3::new(x_max, y_max, t),
                )
            },
            Node::Union(a, b) => a.bounding_box().merged(&b.bounding_box()),
            // A cut can only shrink the left operand.
            Node::Difference(a, _) => a.bounding_box(),
            Node::Transform { iso, inner } => {
                let aabb = inner.bounding_box();
                let corners = [
                    Point3::new(aabb.mins.x, aabb.mins.y, aabb.mins.z),
                    Point3::new(aabb.maxs.x, aabb.mins.y, aabb.mins.z),
                    Point3::new(aabb.mins.x, aabb.maxs.y, aabb.mins.z),
                    Point3::new(aabb.maxs.x, aabb.maxs.y, aabb.mins.z),
                    Point3::new(aabb.mins.x, aabb.mins.y, aabb.maxs.z),
                    Point3::new(aabb.maxs.x, aabb.mins.y, aabb.maxs.z),
                    Point3::new(aabb.mins.x, aabb.maxs.y, aabb.maxs.z),
                    Point3::new(aabb.maxs.x, aabb.maxs.y, aabb.maxs.z),
                ];
                let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
                let mut maxs = Point3::new(Real::MIN, Real::MIN, Real::MIN);
                for corner in corners {
                    let p = iso.transform_point(&corner);
                    mins = mins.inf(&p);
                    maxs = maxs.sup(&p);
                }
                Aabb::new(mins, maxs)
            },
        }
    }

    /// Exact point-membership test (boundary counts as inside).
    pub fn contains(&self, point: &Point3<Real>) -> bool {
        sdf::distance(self, point) <= 0.0
    }

    /// Deterministic volume estimate: classifies the centers of a
    /// `samples_per_axis`³ grid over the bounding box. Intended for tests
    /// and diagnostics, not for physics.
    pub fn approximate_volume(&self, samples_per_axis: usize) -> Real {
        let n = samples_per_axis.max(2);
        let aabb = self.bounding_box();
        let extents = aabb.maxs - aabb.mins;
        let dx = extents.x / n as Real;
        let dy = extents.y / n as Real;
        let dz = extents.z / n as Real;
        if !(dx.is_finite() && dy.is_finite() && dz.is_finite()) {
            return Real::NAN;
        }

        let mut inside = 0usize;
        for ix in 0..n {
            for iy in 0..n {
                for iz in 0..n {
                    let p = Point3::new(
                        aabb.mins.x + (ix as Real + 0.5) * dx,
                        aabb.mins.y + (iy as Real + 0.5) * dy,
                        aabb.mins.z + (iz as Real + 0.5) * dz,
                    );
                    if self.contains(&p) {
                        inside += 1;
                    }
                }
            }
        }
        inside as Real * dx * dy * dz
    }

    /// Triangulates the solid's surface on a sampled grid of the given
    /// resolution. See [`meshing::surface_mesh`].
    pub fn surface_mesh(&self, resolution: (usize, usize, usize)) -> Result<TriMesh, BuildError> {
        meshing::surface_mesh(self, resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn cylinder_contains_axis_and_excludes_outside() {
        let cyl = Solid::cylinder(1.0, 4.0);
        assert!(cyl.contains(&Point3::new(0.0, 0.0, 0.0)));
        assert!(cyl.contains(&Point3::new(0.9, 0.0, 1.9)));
        assert!(!cyl.contains(&Point3::new(1.1, 0.0, 0.0)));
        assert!(!cyl.contains(&Point3::new(0.0, 0.0, 2.1)));
    }

    #[test]
    fn cylinder_along_y_spans_zero_to_length() {
        let tube = Solid::cylinder_along_y(0.5, 10.0);
        assert!(tube.contains(&Point3::new(0.0, 0.1, 0.0)));
        assert!(tube.contains(&Point3::new(0.0, 9.9, 0.0)));
        assert!(!tube.contains(&Point3::new(0.0, -0.1, 0.0)));
        assert!(!tube.contains(&Point3::new(0.0, 10.1, 0.0)));
        let aabb = tube.bounding_box();
        assert!(approx_eq(aabb.mins.y, 0.0, 1e-9));
        assert!(approx_eq(aabb.maxs.y, 10.0, 1e-9));
    }

    #[test]
    fn difference_removes_the_bore() {
        let disk = Solid::cylinder(2.0, 1.0);
        let bore = Solid::cylinder(0.5, 2.0);
        let annulus = disk.difference(&bore);
        assert!(!annulus.contains(&Point3::new(0.0, 0.0, 0.0)));
        assert!(annulus.contains(&Point3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn union_is_value_semantic() {
        let a = Solid::cuboid(1.0, 1.0, 1.0);
        let b = Solid::cuboid(1.0, 1.0, 1.0).translate(2.0, 0.0, 0.0);
        let both = a.union(&b);
        // inputs still usable and unchanged
        assert!(a.contains(&Point3::new(0.0, 0.0, 0.0)));
        assert!(!a.contains(&Point3::new(2.0, 0.0, 0.0)));
        assert!(both.contains(&Point3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn torus_segment_follows_the_arc() {
        // Quarter sweep, ring radius 10, tube radius 1.
        let seg = Solid::torus_segment(10.0, 1.0, FRAC_PI_2);
        // start profile center
        assert!(seg.contains(&Point3::new(-10.0, 0.0, 0.0)));
        // mid-arc point at φ = 3π/4
        let phi: Real = 0.75 * crate::float_types::PI;
        assert!(seg.contains(&Point3::new(10.0 * phi.cos(), 10.0 * phi.sin(), 0.0)));
        // beyond the end cap (φ = π/4 is outside the [π/2, π] arc)
        let outside: Real = 0.25 * crate::float_types::PI;
        assert!(!seg.contains(&Point3::new(
            10.0 * outside.cos(),
            10.0 * outside.sin(),
            0.0
        )));
        // before the start cap
        assert!(!seg.contains(&Point3::new(-10.0, -1.5, 0.0)));
    }

    #[test]
    fn cuboid_volume_estimate_matches_analytic() {
        let volume = Solid::cuboid(2.0, 3.0, 4.0).approximate_volume(24);
        assert!(approx_eq(volume, 24.0, 1e-6));
    }

    #[test]
    fn translated_bounding_box_moves_with_the_solid() {
        let aabb = Solid::cuboid(2.0, 2.0, 2.0)
            .translate(10.0, 0.0, 0.0)
            .bounding_box();
        assert!(approx_eq(aabb.mins.x, 9.0, 1e-12));
        assert!(approx_eq(aabb.maxs.x, 11.0, 1e-12));
    }

    #[test]
    fn stacked_transforms_collapse() {
        let moved = Solid::cuboid(1.0, 1.0, 1.0)
            .translate(1.0, 0.0, 0.0)
            .translate(0.0, 1.0, 0.0)
            .rotate(0.0, 0.0, 90.0);
        // (1, 1) rotated 90° about Z lands at (-1, 1)
        assert!(moved.contains(&Point3::new(-1.0, 1.0, 0.0)));
        match moved.node() {
            Node::Transform { inner, .. } => {
                assert!(matches!(inner.node(), Node::Cuboid { .. }));
            },
            other => panic!("expected a single transform node, got {:?}", other),
        }
    }
}
