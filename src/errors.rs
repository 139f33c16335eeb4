//! Build and validation errors.
//!
//! All failures surface as [`BuildError`] and propagate to the top-level
//! build call; there are no retries because geometric construction is
//! deterministic and replaying an identical failing operation fails
//! identically. Messages name the offending component and parameter so an
//! aborted build is actionable from the log alone.

use crate::float_types::Real;

/// All the possible failures of a divertor build.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// A dimensional parameter is non-positive or violates a structural
    /// invariant. Detected before any kernel call.
    #[error("invalid geometry in {component}: {parameter} = {value} ({constraint})")]
    InvalidGeometry {
        component: &'static str,
        parameter: &'static str,
        value: Real,
        constraint: &'static str,
    },

    /// The three circle-fit control points are colinear; no circle passes
    /// through them.
    #[error("degenerate circle: the three control points are colinear")]
    DegenerateCircle,

    /// An arithmetic operation left its domain: an acos argument grossly
    /// outside [-1, 1], or a division by a zero radius.
    #[error("arithmetic domain error: {what}")]
    ArithmeticDomain { what: &'static str },

    /// A kernel evaluation, meshing or export operation failed. Propagated,
    /// never swallowed.
    #[error("kernel operation failed: {0}")]
    Kernel(String),

    /// The build was aborted through a [`CancelToken`](crate::cancel::CancelToken).
    #[error("build cancelled")]
    Cancelled,
}

impl BuildError {
    /// Shorthand for the "must be positive" flavour of [`BuildError::InvalidGeometry`].
    pub(crate) fn non_positive(
        component: &'static str,
        parameter: &'static str,
        value: Real,
    ) -> Self {
        BuildError::InvalidGeometry {
            component,
            parameter,
            value,
            constraint: "must be > 0",
        }
    }
}
