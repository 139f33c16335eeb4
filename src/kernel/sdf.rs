//! Signed-distance evaluation of the solid expression tree.
//!
//! Primitive distances are exact; booleans use the standard min/max
//! combination, which keeps the sign (and therefore point membership) exact
//! while only approximating the Euclidean distance away from the surface.
//! Surface-nets meshing tolerates that approximation.

use nalgebra::{Point3, Vector2};

use super::{Node, Solid};
use crate::float_types::Real;

/// Signed distance from `point` to the surface of `solid`; negative inside.
pub fn distance(solid: &Solid, point: &Point3<Real>) -> Real {
    match solid.node() {
        Node::Cylinder { radius, height } => {
            let radial = point.coords.xy().norm() - radius;
            let axial = point.z.abs() - height / 2.0;
            let outside = Vector2::new(radial.max(0.0), axial.max(0.0)).norm();
            outside + radial.max(axial).min(0.0)
        },
        Node::Cuboid { x, y, z } => {
            let qx = point.x.abs() - x / 2.0;
            let qy = point.y.abs() - y / 2.0;
            let qz = point.z.abs() - z / 2.0;
            let outside = nalgebra::Vector3::new(qx.max(0.0), qy.max(0.0), qz.max(0.0)).norm();
            outside + qx.max(qy).max(qz).min(0.0)
        },
        Node::TorusSegment {
            ring_radius,
            tube_radius,
            sweep,
        } => {
            // Full ring distance in the revolve frame.
            let radial = point.coords.xy().norm() - ring_radius;
            let ring = Vector2::new(radial, point.z).norm() - tube_radius;
            // Cap planes: the swept arc occupies φ ∈ [π - sweep, π], which
            // for sweep ≤ π is the wedge {y ≥ 0} ∩ {x·sin(sweep) + y·cos(sweep) ≤ 0}.
            let start_cap = -point.y;
            let end_cap = point.x * sweep.sin() + point.y * sweep.cos();
            ring.max(start_cap).max(end_cap)
        },
        Node::Union(a, b) => distance(a, point).min(distance(b, point)),
        Node::Difference(a, b) => distance(a, point).max(-distance(b, point)),
        Node::Transform { iso, inner } => {
            distance(inner, &iso.inverse_transform_point(point))
        },
    }
}
