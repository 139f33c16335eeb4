//! Parametric CSG generator for fusion-divertor plasma-facing components.
//!
//! The crate builds water-cooled tungsten monoblock assemblies as opaque
//! [`Solid`](kernel::Solid) values combined with Boolean operations and rigid
//! transforms, then meshes and exports them as STL:
//!
//! - [`monoblock`]: one tungsten/copper/CuCrZr block around a cooling bore,
//! - [`pfu`]: a plasma-facing unit, monoblocks threaded onto a straight plus
//!   curved cooling tube,
//! - [`target`]: a toroidal array of PFU replicas,
//! - [`dome`]: a curve-only target whose radius and sweep come from a
//!   three-point circle fit ([`circle_fit`]).
//!
//! Solids are evaluated as signed-distance fields and triangulated with
//! [fast-surface-nets](https://crates.io/crates/fast-surface-nets); see
//! [`kernel`].
//!
//! # Features
//! - **parallel**: build the monoblocks of a PFU with rayon.

#![forbid(unsafe_code)]
#![warn(clippy::approx_constant, clippy::all)]

pub mod cancel;
pub mod circle_fit;
pub mod dome;
pub mod errors;
pub mod float_types;
pub mod io;
pub mod kernel;
pub mod monoblock;
pub mod pfu;
pub mod shape;
pub mod target;

pub use cancel::CancelToken;
pub use circle_fit::CircleFit;
pub use dome::{Dome, DomeSpec};
pub use errors::BuildError;
pub use kernel::Solid;
pub use monoblock::{Monoblock, MonoblockSpec, MonoblockTemplate};
pub use pfu::{Pfu, PfuSpec};
pub use shape::Shape;
pub use target::{Target, TargetSpec};
