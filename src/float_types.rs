//! Scalar type and numeric constants used across the crate.

// Re-export parry so downstream code names a single bounding-volume type.
pub use parry3d_f64 as parry3d;

/// Our Real scalar type. All geometry in this crate is f64.
pub type Real = f64;

/// Small positive value used for floating-point comparisons and to absorb
/// accumulated round-off in validation checks.
pub const EPSILON: Real = 1e-9;

/// Determinant threshold below which three fit points are treated as
/// colinear.
pub const COLINEARITY_EPSILON: Real = 1e-6;

/// Archimedes' constant (π)
pub const PI: Real = core::f64::consts::PI;

/// π/2
pub const FRAC_PI_2: Real = core::f64::consts::FRAC_PI_2;

/// The full circle constant (τ)
pub const TAU: Real = core::f64::consts::TAU;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// Unit conversion: all dimensions in this crate are millimetres
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
pub const MM: Real = 1.0;
pub const CM: Real = 10.0;
pub const METER: Real = 1000.0;
