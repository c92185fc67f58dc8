//! absorb — panel-data within-transformation (fixed-effects absorption)
//! stack: core kernels, driver, and errors.
//!
//! Purpose
//! -------
//! Provide the complete fixed-effects demeaning layer for panel regressions:
//! group key encoding, weighted group statistics, the within-transform
//! kernel, and the multi-effect absorption driver, under a single namespace
//! with a uniform error surface. This is the module consumers (including the
//! Python bindings) should depend on.
//!
//! Key behaviors
//! -------------
//! - Collect the numerical building blocks in [`core`]: validated panel
//!   containers, first-seen-order group encoding, one-pass weighted group
//!   statistics, the demeaning kernel, nesting detection, and options.
//! - Expose the user-facing driver in [`models`] via [`Absorber`], covering
//!   exact single-effect demeaning and K ≥ 2 alternating projection with
//!   convergence diagnostics and nesting-aware absorbed degrees of freedom.
//! - Centralize errors in [`errors`] ([`AbsorbError`] and the
//!   [`AbsorbResult`] alias) so callers see one error surface across the
//!   stack.
//!
//! Invariants & assumptions
//! ------------------------
//! - Panels are carried in validated [`PanelData`] instances: non-empty,
//!   weight lengths agree, weights finite and non-negative.
//! - Encoded effect columns ([`GroupIndex`]) guarantee dense in-range ids,
//!   so per-group buffers are indexed without bounds checks on the group
//!   dimension.
//! - The engine is pure and stateless per call: inputs are borrowed
//!   read-only, outputs are fresh matrices, and independent calls are safe
//!   to run concurrently.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based throughout; rows are observations, columns are
//!   numeric features.
//! - Structural errors fail fast before any computation; degenerate groups
//!   and slow convergence are diagnostics on [`TransformResult`], never
//!   errors.
//! - The stack performs no I/O and no logging; callers orchestrate data
//!   loading and reporting.
//!
//! Downstream usage
//! ----------------
//! - Typical end-to-end flow:
//!   1. Construct [`PanelData`] from the feature matrix and weights.
//!   2. Encode each effect column with [`encode_groups`] (or let
//!      [`Absorber::absorb_columns`] do it, with missing-value checking).
//!   3. Build [`AbsorbOptions`] (tolerance, iteration cap, level recovery)
//!      and an [`Absorber`].
//!   4. Call [`Absorber::absorb`]; feed
//!      [`TransformResult::demeaned`](crate::absorb::models::TransformResult::demeaned)
//!      and
//!      [`TransformResult::absorbed_df`](crate::absorb::models::TransformResult::absorbed_df)
//!      to the regression layer.
//! - Python bindings import from this module and rely on the
//!   `AbsorbError → PyErr` conversion defined in [`errors`].

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------
//
// The "everyday" types most users need. Lower-level pieces (validation
// helpers, the in-place kernel, refinement checks) remain under their
// submodules.

pub use self::core::{
    AbsorbOptions, GroupIndex, GroupStats, PanelData, encode_groups, encode_groups_checked,
    within_transform,
};

pub use self::errors::{AbsorbError, AbsorbResult};

pub use self::models::{Absorber, TransformResult};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_panel::absorb::prelude::*;
//
// to import the main absorption surface in a single line.

pub mod prelude {
    pub use super::{
        AbsorbError, AbsorbOptions, AbsorbResult, Absorber, GroupIndex, GroupStats, PanelData,
        TransformResult, encode_groups, encode_groups_checked, within_transform,
    };
}
