//! A single armor/cooling monoblock.
//!
//! One plasma-facing unit cell: a tungsten armor tile around a copper
//! interlayer around a CuCrZr tube wall, all pierced by the circular coolant
//! bore. The cross-section is built in the plane defined by `location` and
//! `normal` (plus an optional in-plane reference direction controlling
//! twist) and needs no further transform by the caller.

use nalgebra::{Isometry3, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};
use tracing::debug;

use crate::errors::BuildError;
use crate::float_types::{EPSILON, Real};
use crate::kernel::Solid;

/// Parameters of one monoblock. Immutable input, validated once before any
/// kernel call.
#[derive(Debug, Clone)]
pub struct MonoblockSpec {
    /// Thickness along the cooling-path axis (mm).
    pub thickness: Real,
    /// Height of the block along the plasma-facing direction (mm).
    pub height: Real,
    /// Width of the block across the path (mm).
    pub width: Real,
    /// Inner radius of the CuCrZr tube wall, i.e. the coolant bore radius (mm).
    pub cucrzr_inner_radius: Real,
    /// Radial thickness of the CuCrZr tube wall (mm).
    pub cucrzr_thickness: Real,
    /// Radial thickness of the copper interlayer (mm).
    pub cu_thickness: Real,
    /// Tungsten above the copper at the middle of the block (mm).
    pub w_thickness: Real,
    /// Axial gap between two adjacent monoblocks (mm).
    pub gap: Real,
    /// When false the copper disk is left full: the continuous tube is cut
    /// out once at the PFU level instead of once per block.
    pub hollow: bool,
    /// Center of the coolant bore.
    pub location: Point3<Real>,
    /// Block axis (the cooling-path tangent).
    pub normal: Vector3<Real>,
    /// Optional in-plane reference direction; fixes the tile's twist.
    pub x_dir: Option<Vector3<Real>>,
}

impl Default for MonoblockSpec {
    /// Reference monoblock dimensions of the divertor model (mm).
    fn default() -> Self {
        Self {
            thickness: 1.2,
            height: 2.8,
            width: 2.3,
            cucrzr_inner_radius: 0.6,
            cucrzr_thickness: 0.15,
            cu_thickness: 0.1,
            w_thickness: 0.5,
            gap: 0.1,
            hollow: true,
            location: Point3::origin(),
            normal: Vector3::z(),
            x_dir: None,
        }
    }
}

impl MonoblockSpec {
    /// Radial material stack measured from the bore center: inner radius,
    /// tube wall, interlayer, armor.
    pub fn radial_stack(&self) -> Real {
        self.cucrzr_inner_radius + self.cucrzr_thickness + self.cu_thickness + self.w_thickness
    }

    /// Rejects non-positive dimensions and a radial stack that does not fit
    /// inside half the block height.
    pub fn validate(&self) -> Result<(), BuildError> {
        let dims = [
            ("thickness", self.thickness),
            ("height", self.height),
            ("width", self.width),
            ("cucrzr_inner_radius", self.cucrzr_inner_radius),
            ("cucrzr_thickness", self.cucrzr_thickness),
            ("cu_thickness", self.cu_thickness),
            ("w_thickness", self.w_thickness),
            ("gap", self.gap),
        ];
        for (parameter, value) in dims {
            if !(value > 0.0) {
                return Err(BuildError::non_positive("monoblock", parameter, value));
            }
        }
        if self.radial_stack() > self.height / 2.0 + EPSILON {
            return Err(BuildError::InvalidGeometry {
                component: "monoblock",
                parameter: "height",
                value: self.height,
                constraint: "radial stack must fit within height/2",
            });
        }
        if self.normal.norm() < EPSILON {
            return Err(BuildError::InvalidGeometry {
                component: "monoblock",
                parameter: "normal",
                value: 0.0,
                constraint: "must be a non-zero direction",
            });
        }
        Ok(())
    }

    /// Rigid placement of the block's local frame: local Z is the block
    /// axis (`normal`), local X the reference direction, local Y the
    /// plasma-facing height axis.
    fn plane(&self) -> Result<Isometry3<Real>, BuildError> {
        let z_axis = self.normal.normalize();
        let x_axis = match self.x_dir {
            Some(x_dir) => {
                let projected = x_dir - z_axis * x_dir.dot(&z_axis);
                if projected.norm() < EPSILON {
                    return Err(BuildError::InvalidGeometry {
                        component: "monoblock",
                        parameter: "x_dir",
                        value: 0.0,
                        constraint: "must not be parallel to the normal",
                    });
                }
                projected.normalize()
            },
            None => {
                // ZX-workplane convention: the in-plane x axis is global Z
                // projected into the plane, so a transverse block keeps its
                // width along the toroidal axis. Axial normals fall back to
                // global X.
                let candidate = Vector3::z() - z_axis * Vector3::z().dot(&z_axis);
                if candidate.norm() < EPSILON {
                    Vector3::x()
                } else {
                    candidate.normalize()
                }
            },
        };
        let y_axis = z_axis.cross(&x_axis);
        let rotation = Rotation3::from_basis_unchecked(&[x_axis, y_axis, z_axis]);
        Ok(Isometry3::from_parts(
            Translation3::from(self.location.coords),
            UnitQuaternion::from_rotation_matrix(&rotation),
        ))
    }
}

/// Placement-free monoblock parameters, shared by every block of a
/// plasma-facing unit. [`MonoblockTemplate::at`] stamps the template into a
/// placed [`MonoblockSpec`].
#[derive(Debug, Clone)]
pub struct MonoblockTemplate {
    pub thickness: Real,
    pub height: Real,
    pub width: Real,
    pub cucrzr_inner_radius: Real,
    pub cucrzr_thickness: Real,
    pub cu_thickness: Real,
    pub w_thickness: Real,
    pub gap: Real,
}

impl Default for MonoblockTemplate {
    fn default() -> Self {
        let spec = MonoblockSpec::default();
        Self {
            thickness: spec.thickness,
            height: spec.height,
            width: spec.width,
            cucrzr_inner_radius: spec.cucrzr_inner_radius,
            cucrzr_thickness: spec.cucrzr_thickness,
            cu_thickness: spec.cu_thickness,
            w_thickness: spec.w_thickness,
            gap: spec.gap,
        }
    }
}

impl MonoblockTemplate {
    /// A placed spec for one block of the sequence.
    pub fn at(
        &self,
        location: Point3<Real>,
        normal: Vector3<Real>,
        x_dir: Option<Vector3<Real>>,
        hollow: bool,
    ) -> MonoblockSpec {
        MonoblockSpec {
            thickness: self.thickness,
            height: self.height,
            width: self.width,
            cucrzr_inner_radius: self.cucrzr_inner_radius,
            cucrzr_thickness: self.cucrzr_thickness,
            cu_thickness: self.cu_thickness,
            w_thickness: self.w_thickness,
            gap: self.gap,
            hollow,
            location,
            normal,
            x_dir,
        }
    }

    /// Validates the dimensional parameters once at the assembly boundary,
    /// before any block is placed.
    pub fn validate(&self) -> Result<(), BuildError> {
        self.at(Point3::origin(), Vector3::z(), None, true).validate()
    }
}

/// The three material solids of one monoblock, already positioned at the
/// spec's `location`/`normal`.
#[derive(Debug, Clone)]
pub struct Monoblock {
    pub tungsten: Solid,
    pub copper: Solid,
    pub cucrzr: Solid,
}

impl Monoblock {
    /// Builds the nested cross-section. The inner bore cylinder is a cutting
    /// tool only and is never retained.
    pub fn build(spec: &MonoblockSpec) -> Result<Self, BuildError> {
        spec.validate()?;
        let plane = spec.plane()?;
        debug!(
            thickness = spec.thickness,
            hollow = spec.hollow,
            "building monoblock"
        );

        let bore = Solid::cylinder(spec.cucrzr_inner_radius, spec.thickness * 2.0);

        let cucrzr = Solid::cylinder(
            spec.cucrzr_inner_radius + spec.cucrzr_thickness,
            spec.thickness + spec.gap,
        )
        .difference(&bore);

        let mut copper = Solid::cylinder(
            spec.cucrzr_inner_radius + spec.cucrzr_thickness + spec.cu_thickness,
            spec.thickness,
        );
        if spec.hollow {
            copper = copper.difference(&cucrzr).difference(&bore);
        }

        // Seat the armor tile so its plasma-facing face sits w_thickness
        // above the copper at the block's mid-line.
        let tile_shift = spec.height / 2.0 - spec.radial_stack();
        let tungsten = Solid::cuboid(spec.width, spec.height, spec.thickness)
            .translate(0.0, tile_shift, 0.0)
            .difference(&copper)
            .difference(&cucrzr)
            .difference(&bore);

        Ok(Self {
            tungsten: tungsten.transform(&plane),
            copper: copper.transform(&plane),
            cucrzr: cucrzr.transform(&plane),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::PI;

    fn spec() -> MonoblockSpec {
        MonoblockSpec::default()
    }

    #[test]
    fn non_positive_dimension_is_rejected_before_building() {
        let bad = MonoblockSpec {
            cu_thickness: 0.0,
            ..spec()
        };
        let err = Monoblock::build(&bad).unwrap_err();
        assert!(matches!(
            err,
            BuildError::InvalidGeometry {
                component: "monoblock",
                parameter: "cu_thickness",
                ..
            }
        ));
    }

    #[test]
    fn oversized_radial_stack_is_rejected() {
        let bad = MonoblockSpec {
            w_thickness: 2.0,
            ..spec()
        };
        assert!(Monoblock::build(&bad).is_err());
    }

    #[test]
    fn bore_pierces_every_material() {
        let mb = Monoblock::build(&spec()).unwrap();
        let bore_center = Point3::origin();
        assert!(!mb.tungsten.contains(&bore_center));
        assert!(!mb.copper.contains(&bore_center));
        assert!(!mb.cucrzr.contains(&bore_center));
    }

    #[test]
    fn hollow_false_keeps_the_full_copper_disk() {
        let mb = Monoblock::build(&MonoblockSpec {
            hollow: false,
            ..spec()
        })
        .unwrap();
        // the cut is deferred to the PFU level
        assert!(mb.copper.contains(&Point3::origin()));
    }

    #[test]
    fn materials_do_not_overlap() {
        let s = spec();
        let mb = Monoblock::build(&s).unwrap();
        let n = 40;
        for ix in 0..n {
            for iy in 0..n {
                let p = Point3::new(
                    -s.width / 2.0 + s.width * (ix as Real + 0.5) / n as Real,
                    -s.height / 2.0 + s.height * (iy as Real + 0.5) / n as Real,
                    0.0,
                );
                let hits = [&mb.tungsten, &mb.copper, &mb.cucrzr]
                    .iter()
                    .filter(|solid| solid.contains(&p))
                    .count();
                assert!(hits <= 1, "point {p} belongs to {hits} materials");
            }
        }
    }

    #[test]
    fn material_volumes_fill_the_block() {
        // Union of tungsten, copper, CuCrZr and the bore reproduces the
        // nominal box volume, plus the CuCrZr annulus overhang of `gap`
        // along the axis (the annulus is thickness+gap tall by design).
        let s = spec();
        let mb = Monoblock::build(&s).unwrap();
        let samples = 100;
        let tungsten = mb.tungsten.approximate_volume(samples);
        let copper = mb.copper.approximate_volume(samples);
        let cucrzr = mb.cucrzr.approximate_volume(samples);
        let bore_disk =
            Solid::cylinder(s.cucrzr_inner_radius, s.thickness).approximate_volume(samples);

        let outer_wall = s.cucrzr_inner_radius + s.cucrzr_thickness;
        let annulus_overhang =
            PI * (outer_wall * outer_wall - s.cucrzr_inner_radius * s.cucrzr_inner_radius)
                * s.gap;
        let expected = s.width * s.height * s.thickness + annulus_overhang;
        let total = tungsten + copper + cucrzr + bore_disk;
        let relative = (total - expected).abs() / expected;
        assert!(
            relative < 0.05,
            "total {total} vs expected {expected} (relative {relative})"
        );
    }

    #[test]
    fn placed_block_needs_no_further_transform() {
        let s = MonoblockSpec {
            location: Point3::new(0.0, 5.0, 0.0),
            normal: Vector3::y(),
            ..spec()
        };
        let mb = Monoblock::build(&s).unwrap();
        // For a +Y normal the width lies along global Z and the tile height
        // along global +X.
        assert!(mb.tungsten.contains(&Point3::new(1.3, 5.0, 0.0)));
        assert!(!mb.tungsten.contains(&Point3::new(1.3, 0.0, 0.0)));
        // width extent is toroidal: half the width along Z
        assert!(mb.tungsten.contains(&Point3::new(1.3, 5.0, 1.0)));
        assert!(!mb.tungsten.contains(&Point3::new(1.3, 5.0, 1.3)));
    }
}
