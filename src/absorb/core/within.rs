//! Within-transform (demeaning) kernel: subtract weighted group means from
//! every observation for a single effect dimension.
//!
//! Purpose
//! -------
//! Implement the projection step of one absorption dimension:
//! `out[i][m] = x[i][m] − mean[group[i]][m]`. The public entry point is pure
//! and allocates exactly one output matrix; the crate-internal in-place
//! variant lets the multi-effect driver project its running residual with no
//! per-iteration allocation.
//!
//! Invariants & assumptions
//! ------------------------
//! - `stats.mean` rows for degenerate groups are zero (guaranteed by
//!   [`GroupStats`](crate::absorb::core::stats::GroupStats) construction), so
//!   degenerate-group members pass through unchanged without a special case
//!   in the loop.
//! - Dimensions are validated by the public entry point; internal callers
//!   validate once up front.
use crate::absorb::core::encoder::GroupIndex;
use crate::absorb::core::stats::GroupStats;
use crate::absorb::errors::{AbsorbError, AbsorbResult};
use ndarray::{Array2, ArrayView2, ArrayViewMut2};

/// Subtract per-group means from a feature matrix.
///
/// Parameters
/// ----------
/// - `features`: N×M matrix to demean. Never mutated.
/// - `index`: encoded effect column of length N.
/// - `stats`: group statistics computed from the same index (G groups, M
///   columns).
///
/// Returns
/// -------
/// `AbsorbResult<Array2<f64>>`
///   - `Ok(out)` where `out[i][m] = features[i][m] − stats.mean[g_i][m]`.
///   - `Err(AbsorbError)` on dimension disagreement between the three
///     arguments; nothing is computed in that case.
///
/// Errors
/// ------
/// - `AbsorbError::GroupIdLengthMismatch` when `index.len() != N`.
/// - `AbsorbError::GroupCountMismatch` when the statistics cover a different
///   number of groups than the index declares.
/// - `AbsorbError::FeatureCountMismatch` when the statistics cover a
///   different number of columns than the matrix.
///
/// Notes
/// -----
/// - Pure: one output allocation, no mutation of inputs. Rows in degenerate
///   groups come through unchanged because their mean row is zero.
pub fn within_transform(
    features: &ArrayView2<f64>, index: &GroupIndex, stats: &GroupStats,
) -> AbsorbResult<Array2<f64>> {
    let n = features.nrows();
    if index.len() != n {
        return Err(AbsorbError::GroupIdLengthMismatch { expected: n, actual: index.len() });
    }
    if stats.n_groups() != index.n_groups {
        return Err(AbsorbError::GroupCountMismatch {
            expected: index.n_groups,
            actual: stats.n_groups(),
        });
    }
    if stats.mean.ncols() != features.ncols() {
        return Err(AbsorbError::FeatureCountMismatch {
            expected: features.ncols(),
            actual: stats.mean.ncols(),
        });
    }
    let mut out = features.to_owned();
    subtract_group_means(&mut out.view_mut(), index, stats);
    Ok(out)
}

/// In-place subtraction of each row's group mean.
///
/// Used by the absorption driver, which computes fresh statistics from the
/// current residuals and then projects in place, avoiding a second matrix.
pub(crate) fn demean_in_place(
    out: &mut ArrayViewMut2<f64>, index: &GroupIndex, stats: &GroupStats,
) {
    subtract_group_means(out, index, stats);
}

fn subtract_group_means(out: &mut ArrayViewMut2<f64>, index: &GroupIndex, stats: &GroupStats) {
    for (i, &g) in index.ids.iter().enumerate() {
        let mean_row = stats.mean.row(g);
        let mut row = out.row_mut(i);
        row -= &mean_row;
    }
}
