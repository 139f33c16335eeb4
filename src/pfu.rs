//! A plasma-facing unit: one cooling tube populated with monoblocks.
//!
//! The cooling path runs straight along +Y from the origin for
//! `straight_length`, then bends through a circular arc of radius
//! `target_radius` in the XY plane toward +X, sweeping `angle_deg` degrees.
//! Monoblocks are threaded onto the path, straight-run blocks first and
//! curve-run blocks after, and the tube/monoblock overlap is resolved by cutting
//! the tube and coolant out of each block's copper.
//!
//! Two deliberate policies apply:
//! - the copper of the **last** block in the sequence is never cut (the
//!   terminal block forms a butt joint at the tip and keeps its full disk);
//! - copper overlap at the straight/curve transition is not deduplicated.

use nalgebra::{Point3, Vector3};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info_span};

use crate::cancel::CancelToken;
use crate::errors::BuildError;
use crate::float_types::{PI, Real};
use crate::kernel::Solid;
use crate::monoblock::{Monoblock, MonoblockTemplate};

/// Parameters of one plasma-facing unit. Immutable input, validated once at
/// the construction boundary.
#[derive(Debug, Clone)]
pub struct PfuSpec {
    /// Length of the straight run (mm). Zero yields the dome case: no
    /// straight tube segment and no straight-run blocks.
    pub straight_length: Real,
    /// Radius of the curved run's center-line arc (mm).
    pub target_radius: Real,
    /// Sweep of the curved run in degrees, strictly inside (0, 180). A zero
    /// sweep is rejected rather than silently skipped.
    pub angle_deg: Real,
    /// Number of monoblocks placed along the curved run.
    pub curve_samples: usize,
    /// Dimensions shared by every monoblock on this unit.
    pub monoblock: MonoblockTemplate,
}

impl Default for PfuSpec {
    /// Reference outer vertical target parameters (mm / degrees).
    fn default() -> Self {
        Self {
            straight_length: 87.0,
            target_radius: 25.0,
            angle_deg: 80.0,
            curve_samples: 54,
            monoblock: MonoblockTemplate::default(),
        }
    }
}

impl PfuSpec {
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.straight_length < 0.0 {
            return Err(BuildError::InvalidGeometry {
                component: "pfu",
                parameter: "straight_length",
                value: self.straight_length,
                constraint: "must be >= 0",
            });
        }
        if !(self.target_radius > 0.0) {
            return Err(BuildError::non_positive(
                "pfu",
                "target_radius",
                self.target_radius,
            ));
        }
        if !(self.angle_deg > 0.0 && self.angle_deg < 180.0) {
            return Err(BuildError::InvalidGeometry {
                component: "pfu",
                parameter: "angle_deg",
                value: self.angle_deg,
                constraint: "must lie strictly inside (0, 180)",
            });
        }
        if self.curve_samples == 0 {
            return Err(BuildError::InvalidGeometry {
                component: "pfu",
                parameter: "curve_samples",
                value: 0.0,
                constraint: "must be >= 1",
            });
        }
        self.monoblock.validate()
    }

    /// Number of blocks on the straight run: ⌊L / (thickness + gap)⌋,
    /// zero when the straight run is absent.
    pub fn straight_block_count(&self) -> usize {
        let step = self.monoblock.thickness + self.monoblock.gap;
        (self.straight_length / step).floor().max(0.0) as usize
    }

    /// Curve-run sample angles θ (radians), linearly spaced from just below
    /// π down to `(180 − angle)·π/180`. The 0.999π start offset keeps the
    /// first sample off the seam at exactly π.
    fn curve_angles(&self) -> Vec<Real> {
        let start = 0.999 * PI;
        let end = (180.0 - self.angle_deg) * PI / 180.0;
        let n = self.curve_samples;
        (0..n)
            .map(|i| {
                let t = if n == 1 {
                    0.0
                } else {
                    i as Real / (n - 1) as Real
                };
                start + t * (end - start)
            })
            .collect()
    }
}

/// One built plasma-facing unit.
#[derive(Debug, Clone)]
pub struct Pfu {
    /// CuCrZr cooling tube over the full straight+curved path, with the
    /// coolant bore already cut out.
    pub tube: Solid,
    /// The coolant volume itself (the tube's bore).
    pub water: Solid,
    /// Straight-run blocks first, then curve-run blocks.
    pub monoblocks: Vec<Monoblock>,
    /// Left-to-right union of every block's tungsten.
    pub tungsten: Solid,
    /// Left-to-right union of every block's copper, after overlap
    /// resolution.
    pub copper: Solid,
}

impl Pfu {
    pub fn build(spec: &PfuSpec) -> Result<Self, BuildError> {
        Self::build_with_cancel(spec, &CancelToken::new())
    }

    pub fn build_with_cancel(spec: &PfuSpec, cancel: &CancelToken) -> Result<Self, BuildError> {
        let span = info_span!("pfu", l = spec.straight_length, angle = spec.angle_deg);
        let _guard = span.enter();
        spec.validate()?;

        let (tube, water) = make_tube(spec);

        let step = spec.monoblock.thickness + spec.monoblock.gap;
        let mut block_specs = Vec::new();
        for i in 0..spec.straight_block_count() {
            block_specs.push(spec.monoblock.at(
                Point3::new(0.0, i as Real * step, 0.0),
                Vector3::y(),
                None,
                false,
            ));
        }
        let radius = spec.target_radius;
        for theta in spec.curve_angles() {
            block_specs.push(spec.monoblock.at(
                Point3::new(
                    radius + radius * theta.cos(),
                    spec.straight_length + radius * theta.sin(),
                    0.0,
                ),
                Vector3::new(theta.sin(), -theta.cos(), 0.0),
                // Fixed reference direction: no twist accumulation along
                // the curve.
                Some(Vector3::z()),
                false,
            ));
        }
        debug!(blocks = block_specs.len(), "placing monoblocks");

        cancel.checkpoint()?;
        #[cfg(feature = "parallel")]
        let mut monoblocks = block_specs
            .par_iter()
            .map(Monoblock::build)
            .collect::<Result<Vec<_>, _>>()?;
        #[cfg(not(feature = "parallel"))]
        let mut monoblocks = {
            let mut blocks = Vec::with_capacity(block_specs.len());
            for block_spec in &block_specs {
                cancel.checkpoint()?;
                blocks.push(Monoblock::build(block_spec)?);
            }
            blocks
        };

        // Overlap resolution: cut the continuous tube and coolant out of
        // every copper disk except the terminal block's.
        let last = monoblocks.len() - 1;
        for block in &mut monoblocks[..last] {
            block.copper = block.copper.difference(&tube).difference(&water);
        }

        // Sequential folds in sequence order, for reproducible numerics.
        let tungsten = union_fold(monoblocks.iter().map(|m| &m.tungsten));
        let copper = union_fold(monoblocks.iter().map(|m| &m.copper));

        Ok(Self {
            tube,
            water,
            monoblocks,
            tungsten,
            copper,
        })
    }
}

/// Straight + curved tube/water pair over the cooling path.
fn make_tube(spec: &PfuSpec) -> (Solid, Solid) {
    let inner = spec.monoblock.cucrzr_inner_radius;
    let outer = inner + spec.monoblock.cucrzr_thickness;
    let sweep = spec.angle_deg.to_radians();
    let radius = spec.target_radius;
    let l = spec.straight_length;

    let curved = |profile: Real| {
        Solid::torus_segment(radius, profile, sweep).translate(radius, l, 0.0)
    };
    let path = |profile: Real| {
        if l > 0.0 {
            Solid::cylinder_along_y(profile, l).union(&curved(profile))
        } else {
            curved(profile)
        }
    };

    let water = path(inner);
    let tube = path(outer).difference(&water);
    (tube, water)
}

/// Left-to-right union over an ordered, non-empty sequence of solids. The
/// fold order is fixed even though ideal CSG union is commutative.
pub(crate) fn union_fold<'a>(mut solids: impl Iterator<Item = &'a Solid>) -> Solid {
    let first = solids
        .next()
        .expect("union_fold requires a non-empty sequence")
        .clone();
    solids.fold(first, |total, next| total.union(next))
}
