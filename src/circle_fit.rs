//! Circle through three points.
//!
//! Pure 2D geometry used to derive the curvature of the dome variant: the
//! center and radius of the circle passing through three control points, and
//! the angle a chord subtends at that circle's center. No kernel calls and
//! no state; repeated calls on identical inputs return identical results.

use nalgebra::Point2;

use crate::errors::BuildError;
use crate::float_types::{COLINEARITY_EPSILON, EPSILON, Real};

/// How much an acos argument may overshoot [-1, 1] before it is treated as a
/// genuine domain error rather than floating-point round-off.
const ACOS_OVERSHOOT: Real = 1e-9;

/// Center, radius and subtended angle of a circle fitted through three points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleFit {
    pub center: Point2<Real>,
    pub radius: Real,
    /// Angle (radians) subtended at the center by the chord between the
    /// first two input points.
    pub subtended_angle: Real,
}

impl CircleFit {
    /// Fits the circle through `a`, `b` and `c`; the subtended angle is that
    /// of the `(a, b)` chord. Colinear inputs yield
    /// [`BuildError::DegenerateCircle`].
    pub fn through(
        a: Point2<Real>,
        b: Point2<Real>,
        c: Point2<Real>,
    ) -> Result<Self, BuildError> {
        let center = compute_center(a, b, c).ok_or(BuildError::DegenerateCircle)?;
        let radius = compute_radius(center, a);
        let subtended_angle = compute_subtended_angle(a, b, radius)?;
        Ok(Self {
            center,
            radius,
            subtended_angle,
        })
    }
}

/// Center of the circle passing through three points, from the
/// perpendicular-bisector linear system. Returns `None` when the determinant
/// of that system vanishes, i.e. the points are colinear.
pub fn compute_center(
    a: Point2<Real>,
    b: Point2<Real>,
    c: Point2<Real>,
) -> Option<Point2<Real>> {
    let temp = b.x * b.x + b.y * b.y;
    let bc = (a.x * a.x + a.y * a.y - temp) / 2.0;
    let cd = (temp - c.x * c.x - c.y * c.y) / 2.0;
    let det = (a.x - b.x) * (b.y - c.y) - (b.x - c.x) * (a.y - b.y);

    if det.abs() < COLINEARITY_EPSILON {
        return None;
    }

    let cx = (bc * (b.y - c.y) - cd * (a.y - b.y)) / det;
    let cy = ((a.x - b.x) * cd - (b.x - c.x) * bc) / det;
    Some(Point2::new(cx, cy))
}

/// Radius of a circle from its center and a point on its edge. A center that
/// coincides with the edge point yields `+∞` rather than an undefined
/// zero-radius circle.
pub fn compute_radius(center: Point2<Real>, edge: Point2<Real>) -> Real {
    if center == edge {
        return Real::INFINITY;
    }
    (center - edge).norm()
}

/// Angle (radians) subtended at the circle's center by the chord between
/// `p1` and `p2`, via the isosceles-triangle identity
/// `acos((2r² − chord²) / (2r²))`.
///
/// A zero radius is rejected instead of dividing by zero, and the acos
/// argument is clamped into [-1, 1] when the overshoot is small enough to be
/// round-off; a grossly out-of-range argument (chord longer than the
/// diameter) is a domain error.
pub fn compute_subtended_angle(
    p1: Point2<Real>,
    p2: Point2<Real>,
    radius: Real,
) -> Result<Real, BuildError> {
    if radius.abs() < EPSILON {
        return Err(BuildError::ArithmeticDomain {
            what: "subtended angle of a zero-radius circle",
        });
    }

    let chord = (p2 - p1).norm();
    let isos_term = (2.0 * radius * radius - chord * chord) / (2.0 * radius * radius);
    if isos_term < -1.0 - ACOS_OVERSHOOT || isos_term > 1.0 + ACOS_OVERSHOOT {
        return Err(BuildError::ArithmeticDomain {
            what: "acos argument outside [-1, 1]: chord does not fit the circle",
        });
    }

    Ok(isos_term.clamp(-1.0, 1.0).acos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::PI;

    fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn unit_circle_through_axis_points() {
        let center = compute_center(
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(-1.0, 0.0),
        )
        .unwrap();
        assert!(approx_eq(center.x, 0.0, 1e-12));
        assert!(approx_eq(center.y, 0.0, 1e-12));
        assert!(approx_eq(
            compute_radius(center, Point2::new(1.0, 0.0)),
            1.0,
            1e-12
        ));
    }

    #[test]
    fn all_inputs_lie_on_the_fitted_circle() {
        let a = Point2::new(-33.0, 0.0);
        let b = Point2::new(33.0, 0.0);
        let c = Point2::new(0.0, 10.0);
        let center = compute_center(a, b, c).unwrap();
        let radius = compute_radius(center, a);
        for p in [a, b, c] {
            assert!(approx_eq((center - p).norm(), radius, 1e-9));
        }
    }

    #[test]
    fn colinear_points_have_no_center() {
        assert!(
            compute_center(
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(2.0, 0.0),
            )
            .is_none()
        );
    }

    #[test]
    fn coincident_center_and_edge_give_infinite_radius() {
        let p = Point2::new(3.0, -2.0);
        assert!(compute_radius(p, p).is_infinite());
    }

    #[test]
    fn semicircle_chord_subtends_pi() {
        let angle = compute_subtended_angle(
            Point2::new(-1.0, 0.0),
            Point2::new(1.0, 0.0),
            1.0,
        )
        .unwrap();
        assert!(approx_eq(angle, PI, 1e-9));
    }

    #[test]
    fn zero_radius_is_rejected() {
        let err = compute_subtended_angle(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            0.0,
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::ArithmeticDomain { .. }));
    }

    #[test]
    fn chord_longer_than_diameter_is_a_domain_error() {
        let err = compute_subtended_angle(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            1.0,
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::ArithmeticDomain { .. }));
    }

    #[test]
    fn dome_profile_fit() {
        // Reference dome profile: chord 66, sagitta 10.
        let fit = CircleFit::through(
            Point2::new(-33.0, 0.0),
            Point2::new(33.0, 0.0),
            Point2::new(0.0, 10.0),
        )
        .unwrap();
        // r = (s² + (c/2)²) / 2s
        assert!(approx_eq(fit.radius, 59.45, 1e-2));
        assert!(fit.subtended_angle > 0.0 && fit.subtended_angle < PI);
    }

    #[test]
    fn fit_is_pure() {
        let a = Point2::new(-3.0, 0.4);
        let b = Point2::new(1.0, 2.0);
        let c = Point2::new(4.0, -1.0);
        let first = CircleFit::through(a, b, c).unwrap();
        let second = CircleFit::through(a, b, c).unwrap();
        assert_eq!(first, second);
    }
}
