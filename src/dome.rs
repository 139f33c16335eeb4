//! The dome: a curved-cap target whose curvature comes from a circle fit.
//!
//! A dome is a degenerate PFU with no straight run at all, whose
//! `target_radius` and sweep angle are derived from the circle through three
//! control points of the dome's longitudinal profile: the two base corners
//! of the chord and the apex at the sagitta. Everything else reuses
//! [`Pfu`](crate::pfu::Pfu) and [`Target`](crate::target::Target) unchanged.

use nalgebra::{Point2, Vector3};
use tracing::{debug, info_span};

use crate::cancel::CancelToken;
use crate::circle_fit::CircleFit;
use crate::errors::BuildError;
use crate::float_types::Real;
use crate::monoblock::MonoblockTemplate;
use crate::pfu::PfuSpec;
use crate::shape::Shape;
use crate::target::{Target, TargetSpec};

/// Parameters of the dome cap.
#[derive(Debug, Clone)]
pub struct DomeSpec {
    /// Chord length of the longitudinal profile (mm).
    pub chord_length: Real,
    /// Profile height at mid-chord (mm).
    pub sagitta: Real,
    pub nb_pfus: usize,
    pub toroidal_gap: Real,
    /// Number of monoblocks along the fitted arc.
    pub curve_samples: usize,
    pub monoblock: MonoblockTemplate,
}

impl Default for DomeSpec {
    /// Reference dome: 66 mm chord, 10 mm sagitta, 54 blocks on the arc.
    fn default() -> Self {
        Self {
            chord_length: 66.0,
            sagitta: 10.0,
            nb_pfus: 5,
            toroidal_gap: 0.2,
            curve_samples: 54,
            monoblock: MonoblockTemplate::default(),
        }
    }
}

impl DomeSpec {
    pub fn validate(&self) -> Result<(), BuildError> {
        if !(self.chord_length > 0.0) {
            return Err(BuildError::non_positive(
                "dome",
                "chord_length",
                self.chord_length,
            ));
        }
        if !(self.sagitta > 0.0) {
            return Err(BuildError::non_positive("dome", "sagitta", self.sagitta));
        }
        Ok(())
    }

    /// Circle through the two chord ends and the apex.
    pub fn profile_fit(&self) -> Result<CircleFit, BuildError> {
        self.validate()?;
        CircleFit::through(
            Point2::new(-self.chord_length / 2.0, 0.0),
            Point2::new(self.chord_length / 2.0, 0.0),
            Point2::new(0.0, self.sagitta),
        )
    }
}

/// A built dome: the fitted curvature plus the replicated target solids.
#[derive(Debug, Clone)]
pub struct Dome {
    pub fit: CircleFit,
    pub target: Target,
}

impl Dome {
    pub fn build(spec: &DomeSpec) -> Result<Self, BuildError> {
        Self::build_with_cancel(spec, &CancelToken::new())
    }

    pub fn build_with_cancel(spec: &DomeSpec, cancel: &CancelToken) -> Result<Self, BuildError> {
        let span = info_span!("dome", chord = spec.chord_length, sagitta = spec.sagitta);
        let _guard = span.enter();

        let fit = spec.profile_fit()?;
        debug!(
            radius = fit.radius,
            angle_deg = fit.subtended_angle.to_degrees(),
            "fitted dome profile"
        );

        let target = Target::build_with_cancel(
            &TargetSpec {
                nb_pfus: spec.nb_pfus,
                toroidal_gap: spec.toroidal_gap,
                pfu: PfuSpec {
                    straight_length: 0.0,
                    target_radius: fit.radius,
                    angle_deg: fit.subtended_angle.to_degrees(),
                    curve_samples: spec.curve_samples,
                    monoblock: spec.monoblock.clone(),
                },
            },
            cancel,
        )?;

        Ok(Self { fit, target })
    }

    /// The dome's four material shapes placed into the reactor frame: a
    /// fixed 90° rotation about X, a geometry-specific tilt about Y, then a
    /// translation.
    pub fn placed_shapes(&self, tilt_y_deg: Real, translation: Vector3<Real>) -> Vec<Shape> {
        [
            ("tungsten", &self.target.tungsten),
            ("copper", &self.target.copper),
            ("cucrzr", &self.target.tube),
            ("water", &self.target.water),
        ]
        .into_iter()
        .map(|(name, solid)| {
            Shape::new(name, solid.clone())
                .rotate(90.0, 0.0, 0.0)
                .rotate(0.0, tilt_y_deg, 0.0)
                .translate_vector(translation)
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::PI;

    fn small_spec() -> DomeSpec {
        DomeSpec {
            nb_pfus: 2,
            curve_samples: 3,
            ..DomeSpec::default()
        }
    }

    #[test]
    fn fitted_radius_and_angle_match_the_profile() {
        let fit = DomeSpec::default().profile_fit().unwrap();
        // r = (sagitta² + (chord/2)²) / (2·sagitta)
        assert!((fit.radius - 59.45).abs() < 1e-9);
        assert!(fit.subtended_angle > 0.0 && fit.subtended_angle < PI);
    }

    #[test]
    fn non_positive_profile_is_rejected() {
        assert!(
            DomeSpec {
                sagitta: 0.0,
                ..small_spec()
            }
            .profile_fit()
            .is_err()
        );
    }

    #[test]
    fn dome_has_no_straight_blocks() {
        let dome = Dome::build(&small_spec()).unwrap();
        for pfu in &dome.target.pfus {
            // curve-only water: nothing below the y = 0 plane
            assert!(pfu.water.bounding_box().mins.y > -1e-9);
        }
    }

    #[test]
    fn placed_shapes_carry_material_names() {
        let dome = Dome::build(&small_spec()).unwrap();
        let shapes = dome.placed_shapes(85.0, Vector3::new(480.0, 0.0, -358.0));
        let names: Vec<_> = shapes.iter().map(Shape::name).collect();
        assert_eq!(names, ["tungsten", "copper", "cucrzr", "water"]);
    }
}
