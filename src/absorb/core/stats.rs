//! Group statistics accumulation: weighted per-group sums and means in one
//! pass.
//!
//! Purpose
//! -------
//! Compute, for one effect dimension, the weighted sum of weights and the
//! weighted mean of every feature column per group. This is the projection
//! coefficient of each demeaning step and is recomputed every iteration of
//! multi-effect absorption because residuals change.
//!
//! Key behaviors
//! -------------
//! - Single linear pass over the N rows; O(N·M) time, O(G·M) auxiliary
//!   space.
//! - All accumulation is performed in `f64`, so repeated accumulation across
//!   absorption iterations does not amplify error through a narrower
//!   accumulator type.
//! - Zero-weight observations contribute nothing to any sum but remain
//!   addressable through the group index (exclusion from the mean, inclusion
//!   in indexing).
//! - Groups whose total weight is exactly zero are **degenerate**: no
//!   well-defined mean exists, so their mean is set to 0 and their id is
//!   recorded in [`GroupStats::degenerate`]. Downstream demeaning then
//!   leaves those rows unchanged.
//!
//! Invariants & assumptions
//! ------------------------
//! - Dimensions and weights are validated before the pass starts
//!   (fail fast); the hot loop assumes `ids[i] < n_groups` as guaranteed by
//!   [`GroupIndex`](crate::absorb::core::encoder::GroupIndex) construction.
//!
//! Conventions
//! -----------
//! - The accumulation pass is sequential and index-ordered, so results are
//!   bitwise reproducible run to run. A partial-sum-then-merge parallel
//!   reduction with fixed partition boundaries would preserve this and is an
//!   extension point, not current behavior.
use crate::absorb::core::encoder::GroupIndex;
use crate::absorb::core::validation::{validate_dimensions, validate_weights};
use crate::absorb::errors::AbsorbResult;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// `GroupStats` — weighted per-group totals and means for one effect
/// dimension.
///
/// Fields
/// ------
/// - `weight_sum`: `Array1<f64>`, length G
///   `weight_sum[g] = Σ weight[i]` over observations `i` with `group[i] = g`.
/// - `mean`: `Array2<f64>`, shape G×M
///   `mean[g][m] = (Σ weight[i]·x[i][m]) / weight_sum[g]` when
///   `weight_sum[g] > 0`, and `0.0` for degenerate groups.
/// - `degenerate`: `Vec<usize>`
///   Ascending group ids whose total weight is zero.
///
/// Invariants
/// ----------
/// - `weight_sum.len() == mean.nrows() == n_groups` of the index used to
///   build this value.
/// - Every entry of `mean` in a degenerate group's row is exactly `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    /// Per-group total weight.
    pub weight_sum: Array1<f64>,
    /// Per-group weighted feature means (zero rows for degenerate groups).
    pub mean: Array2<f64>,
    /// Group ids with zero total weight, ascending.
    pub degenerate: Vec<usize>,
}

impl GroupStats {
    /// Accumulate weighted group statistics for a feature matrix.
    ///
    /// Parameters
    /// ----------
    /// - `index`: encoded effect column of length N with G groups.
    /// - `weights`: N finite, non-negative weights.
    /// - `features`: N×M feature matrix.
    ///
    /// Returns
    /// -------
    /// `AbsorbResult<GroupStats>`
    ///   - `Ok(GroupStats)` after one pass over the rows.
    ///   - `Err(AbsorbError)` if dimensions disagree or weights are invalid;
    ///     no accumulation is attempted in that case.
    ///
    /// Errors
    /// ------
    /// - `AbsorbError::EmptyPanel`, `GroupIdLengthMismatch`,
    ///   `WeightLengthMismatch` from dimension validation.
    /// - `AbsorbError::NonFiniteWeight` / `NegativeWeight` from the weight
    ///   scan.
    ///
    /// Notes
    /// -----
    /// - O(N·M) time, O(G·M) space, one allocation for the sums and one for
    ///   the weight totals; means are formed in place from the sums.
    pub fn compute(
        index: &GroupIndex, weights: &ArrayView1<f64>, features: &ArrayView2<f64>,
    ) -> AbsorbResult<Self> {
        validate_dimensions(index, weights, features)?;
        validate_weights(weights)?;
        Ok(Self::compute_unchecked(index, weights, features))
    }

    /// Accumulation pass without re-validating inputs.
    ///
    /// The absorption driver validates once up front and then calls this
    /// every iteration; dimensions and weights cannot change mid-call.
    pub(crate) fn compute_unchecked(
        index: &GroupIndex, weights: &ArrayView1<f64>, features: &ArrayView2<f64>,
    ) -> Self {
        let n_groups = index.n_groups;
        let n_cols = features.ncols();

        let mut weight_sum = Array1::<f64>::zeros(n_groups);
        let mut mean = Array2::<f64>::zeros((n_groups, n_cols));

        for (i, &g) in index.ids.iter().enumerate() {
            let w = weights[i];
            if w == 0.0 {
                continue;
            }
            weight_sum[g] += w;
            let row = features.row(i);
            let mut acc = mean.row_mut(g);
            acc.scaled_add(w, &row);
        }

        let mut degenerate = Vec::new();
        for g in 0..n_groups {
            let total = weight_sum[g];
            if total > 0.0 {
                let mut row = mean.row_mut(g);
                row.mapv_inplace(|s| s / total);
            } else {
                // mean rows start zeroed, which is exactly the degenerate
                // convention: members of this group receive zero demeaning.
                degenerate.push(g);
            }
        }

        GroupStats { weight_sum, mean, degenerate }
    }

    /// Number of groups covered by these statistics.
    pub fn n_groups(&self) -> usize {
        self.weight_sum.len()
    }
}
