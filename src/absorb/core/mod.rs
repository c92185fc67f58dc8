//! absorb::core — building blocks of the within-transformation engine.
//!
//! Purpose
//! -------
//! Collect the validated containers and single-pass numerical kernels the
//! absorption driver is assembled from: panel data containers, group key
//! encoding, weighted group statistics, the demeaning kernel, nesting
//! detection, options, and fail-fast validation.
//!
//! Key behaviors
//! -------------
//! - [`data`] validates feature matrices and weight vectors once at the
//!   boundary so hot loops can trust their inputs.
//! - [`encoder`] maps raw categorical keys to dense first-seen-order group
//!   ids ([`GroupIndex`]).
//! - [`stats`] accumulates weighted per-group sums/means in one O(N·M) pass
//!   ([`GroupStats`]).
//! - [`within`] subtracts group means ([`within_transform`]), the projection
//!   step of one absorption dimension.
//! - [`nesting`] detects when one effect's groups refine another's, which
//!   feeds the absorbed degrees-of-freedom correction.
//! - [`options`] carries validated convergence configuration
//!   ([`AbsorbOptions`]).
//!
//! Conventions
//! -----------
//! - All passes are sequential and index-ordered, giving bitwise
//!   run-to-run reproducibility.
//! - Structural problems (dimension mismatches, missing effect values,
//!   invalid weights) fail fast before any arithmetic; numerical conditions
//!   (degenerate groups, slow convergence) are diagnostics on results.

pub mod data;
pub mod encoder;
pub mod nesting;
pub mod options;
pub mod stats;
pub mod validation;
pub mod within;

pub use self::data::PanelData;
pub use self::encoder::{GroupIndex, encode_groups, encode_groups_checked};
pub use self::nesting::{is_refinement, redundant_effects};
pub use self::options::{
    ABSOLUTE_FLOOR, AbsorbOptions, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE,
};
pub use self::stats::GroupStats;
pub use self::within::within_transform;
