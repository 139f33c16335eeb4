//! Toroidal replication of a plasma-facing unit into a target.
//!
//! One reference PFU is built, then each replica is produced by a rigid
//! translation of the reference solids along the toroidal axis Z. Boolean
//! construction is expensive, a rigid transform is cheap, so replicas are
//! cloned, never rebuilt.

use tracing::{debug, info_span};

use crate::cancel::CancelToken;
use crate::errors::BuildError;
use crate::float_types::Real;
use crate::kernel::Solid;
use crate::pfu::{Pfu, PfuSpec, union_fold};

/// Parameters of a toroidal target.
#[derive(Debug, Clone)]
pub struct TargetSpec {
    /// Number of PFU replicas, at least 1.
    pub nb_pfus: usize,
    /// Toroidal clearance between adjacent replicas (mm), non-negative.
    pub toroidal_gap: Real,
    pub pfu: PfuSpec,
}

impl Default for TargetSpec {
    /// Reference outer vertical target: five PFUs, 0.2 mm apart.
    fn default() -> Self {
        Self {
            nb_pfus: 5,
            toroidal_gap: 0.2,
            pfu: PfuSpec::default(),
        }
    }
}

impl TargetSpec {
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.nb_pfus < 1 {
            return Err(BuildError::InvalidGeometry {
                component: "target",
                parameter: "nb_pfus",
                value: self.nb_pfus as Real,
                constraint: "must be >= 1",
            });
        }
        if self.toroidal_gap < 0.0 {
            return Err(BuildError::InvalidGeometry {
                component: "target",
                parameter: "toroidal_gap",
                value: self.toroidal_gap,
                constraint: "must be >= 0",
            });
        }
        self.pfu.validate()
    }

    /// Toroidal pitch between adjacent replicas.
    pub fn pitch(&self) -> Real {
        self.pfu.monoblock.width + self.toroidal_gap
    }
}

/// One replica's cloned solids.
#[derive(Debug, Clone)]
pub struct PfuSolids {
    pub tungsten: Solid,
    pub copper: Solid,
    pub tube: Solid,
    pub water: Solid,
}

/// A toroidal array of PFUs with per-material aggregates.
#[derive(Debug, Clone)]
pub struct Target {
    pub pfus: Vec<PfuSolids>,
    pub tungsten: Solid,
    pub copper: Solid,
    pub tube: Solid,
    pub water: Solid,
}

impl Target {
    pub fn build(spec: &TargetSpec) -> Result<Self, BuildError> {
        Self::build_with_cancel(spec, &CancelToken::new())
    }

    pub fn build_with_cancel(spec: &TargetSpec, cancel: &CancelToken) -> Result<Self, BuildError> {
        let span = info_span!("target", nb_pfus = spec.nb_pfus);
        let _guard = span.enter();
        spec.validate()?;

        let base = Pfu::build_with_cancel(&spec.pfu, cancel)?;
        let pitch = spec.pitch();

        let mut pfus = Vec::with_capacity(spec.nb_pfus);
        for i in 0..spec.nb_pfus {
            cancel.checkpoint()?;
            debug!(replica = i, "placing PFU");
            let offset = -(i as Real) * pitch;
            let place = |solid: &Solid| {
                if i == 0 {
                    solid.clone()
                } else {
                    solid.translate(0.0, 0.0, offset)
                }
            };
            pfus.push(PfuSolids {
                tungsten: place(&base.tungsten),
                copper: place(&base.copper),
                tube: place(&base.tube),
                water: place(&base.water),
            });
        }

        // Per-material folds across replicas, in index order.
        let tungsten = union_fold(pfus.iter().map(|p| &p.tungsten));
        let copper = union_fold(pfus.iter().map(|p| &p.copper));
        let tube = union_fold(pfus.iter().map(|p| &p.tube));
        let water = union_fold(pfus.iter().map(|p| &p.water));

        Ok(Self {
            pfus,
            tungsten,
            copper,
            tube,
            water,
        })
    }
}
