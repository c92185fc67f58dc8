//! Panel data containers for the absorption engine.
//!
//! Purpose
//! -------
//! Provide a small, validated container for the numeric side of a panel
//! dataset: an N×M feature matrix (regressors and/or dependent variables,
//! transformed together because they share group structure) and an N-length
//! weight vector. This module centralizes input validation so downstream
//! demeaning code can assume clean data.
//!
//! Key behaviors
//! -------------
//! - [`PanelData`] enforces basic invariants (non-empty panel, weight length
//!   agreement, finite and non-negative weights).
//! - Zero weights are legal: a zero-weight observation is excluded from group
//!   means but keeps its row in every transform output.
//!
//! Invariants & assumptions
//! ------------------------
//! - `features.nrows() > 0`.
//! - `weights.len() == features.nrows()`.
//! - All weights are finite and `>= 0.0`.
//! - The panel-level invariant that (entity id, time id) pairs are unique is
//!   the **caller's contract**: the engine never consumes raw entity/time
//!   columns directly, only encoded effect columns, so it cannot and does not
//!   re-check uniqueness.
//!
//! Conventions
//! -----------
//! - Rows are observations, columns are numeric features. Indexing is
//!   0-based.
//! - The engine borrows `PanelData` read-only and emits fresh matrices; input
//!   is never mutated in place.
//!
//! Downstream usage
//! ----------------
//! - Construct [`PanelData`] at the boundary where raw matrices enter the
//!   absorption stack; pass it by reference to
//!   [`Absorber::absorb`](crate::absorb::models::Absorber::absorb).
//! - Consumers may safely rely on `PanelData` invariants when implementing
//!   accumulation passes.
//!
//! Testing notes
//! -------------
//! - Unit tests cover construction behavior for `PanelData::new` (happy path,
//!   empty panel, weight length mismatch, non-finite and negative weights)
//!   and the `unweighted` convenience constructor.
use crate::absorb::errors::{AbsorbError, AbsorbResult};
use ndarray::{Array1, Array2};

/// `PanelData` — validated feature matrix plus observation weights.
///
/// Purpose
/// -------
/// Represent the numeric portion of a panel dataset handed to the absorption
/// engine: one row per observation, one column per numeric feature, and one
/// weight per observation (1.0 everywhere for unweighted panels).
///
/// Fields
/// ------
/// - `features`: `Array2<f64>`
///   Observation rows × feature columns. Never mutated by the engine.
/// - `weights`: `Array1<f64>`
///   Per-observation weights; finite, `>= 0.0`, length equals
///   `features.nrows()`.
///
/// Invariants
/// ----------
/// - `features.nrows() > 0`.
/// - `weights.len() == features.nrows()`.
/// - Every weight is finite and non-negative.
///
/// Performance
/// -----------
/// - Validation is O(N) in the number of observations due to a single scan
///   over `weights`. After construction this type is a plain container.
///
/// Notes
/// -----
/// - Feature values themselves are not range-checked here; non-finite
///   features propagate through demeaning arithmetically, exactly as they
///   would through any other linear pass. Callers wanting stricter input
///   hygiene should pre-screen columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelData {
    /// Observation rows × numeric feature columns.
    pub features: Array2<f64>,
    /// Per-observation weights (finite, >= 0, zero allowed).
    pub weights: Array1<f64>,
}

impl PanelData {
    /// Construct a validated [`PanelData`] instance.
    ///
    /// Parameters
    /// ----------
    /// - `features`: `Array2<f64>`
    ///   Feature matrix with one row per observation. Must be non-empty.
    /// - `weights`: `Array1<f64>`
    ///   Observation weights. Length must equal `features.nrows()`; entries
    ///   must be finite and non-negative (zero is permitted).
    ///
    /// Returns
    /// -------
    /// `AbsorbResult<PanelData>`
    ///   - `Ok(PanelData)` if all invariants are satisfied.
    ///   - `Err(AbsorbError)` if validation fails.
    ///
    /// Errors
    /// ------
    /// - `AbsorbError::EmptyPanel` when `features.nrows() == 0`.
    /// - `AbsorbError::WeightLengthMismatch { expected, actual }` when the
    ///   weight vector length disagrees with the row count.
    /// - `AbsorbError::NonFiniteWeight { index, value }` when a weight is NaN
    ///   or ±∞; `index` points to the first offending element.
    /// - `AbsorbError::NegativeWeight { index, value }` when a weight is
    ///   strictly negative.
    ///
    /// Notes
    /// -----
    /// - Validation stops at the first invalid weight.
    pub fn new(features: Array2<f64>, weights: Array1<f64>) -> AbsorbResult<Self> {
        if features.nrows() == 0 {
            return Err(AbsorbError::EmptyPanel);
        }
        if weights.len() != features.nrows() {
            return Err(AbsorbError::WeightLengthMismatch {
                expected: features.nrows(),
                actual: weights.len(),
            });
        }
        for (index, &value) in weights.iter().enumerate() {
            if !value.is_finite() {
                return Err(AbsorbError::NonFiniteWeight { index, value });
            }
            if value < 0.0 {
                return Err(AbsorbError::NegativeWeight { index, value });
            }
        }
        Ok(PanelData { features, weights })
    }

    /// Construct an unweighted panel (all weights 1.0).
    ///
    /// Equivalent to `PanelData::new(features, Array1::ones(n))` and subject
    /// to the same `EmptyPanel` check.
    pub fn unweighted(features: Array2<f64>) -> AbsorbResult<Self> {
        let n = features.nrows();
        PanelData::new(features, Array1::ones(n))
    }

    /// Number of observations (rows).
    pub fn n_obs(&self) -> usize {
        self.features.nrows()
    }

    /// Number of numeric feature columns.
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }
}
