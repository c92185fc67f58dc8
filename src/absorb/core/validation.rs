//! Fail-fast structural validation shared by the accumulation and demeaning
//! passes.
//!
//! All checks here run **before** any arithmetic starts, so a dimension
//! mismatch never produces a partially computed result. Numerical conditions
//! (degenerate groups, slow convergence) are deliberately out of scope; those
//! are diagnostics, not errors.
use crate::absorb::core::encoder::GroupIndex;
use crate::absorb::errors::{AbsorbError, AbsorbResult};
use ndarray::{ArrayView1, ArrayView2};

/// Check that a group index, weight vector, and feature matrix agree on the
/// observation count.
///
/// Parameters
/// ----------
/// - `index`: encoded effect column; `index.len()` must equal the feature
///   row count.
/// - `weights`: per-observation weights; same length requirement.
/// - `features`: N×M feature matrix defining the expected row count.
///
/// Errors
/// ------
/// - `AbsorbError::EmptyPanel` when `features` has zero rows.
/// - `AbsorbError::GroupIdLengthMismatch { expected, actual }`.
/// - `AbsorbError::WeightLengthMismatch { expected, actual }`.
pub fn validate_dimensions(
    index: &GroupIndex, weights: &ArrayView1<f64>, features: &ArrayView2<f64>,
) -> AbsorbResult<()> {
    let n = features.nrows();
    if n == 0 {
        return Err(AbsorbError::EmptyPanel);
    }
    if index.len() != n {
        return Err(AbsorbError::GroupIdLengthMismatch { expected: n, actual: index.len() });
    }
    if weights.len() != n {
        return Err(AbsorbError::WeightLengthMismatch { expected: n, actual: weights.len() });
    }
    Ok(())
}

/// Check that every weight is finite and non-negative.
///
/// Zero weights pass: they exclude an observation from group means without
/// dropping its row. Stops at the first offending element.
pub fn validate_weights(weights: &ArrayView1<f64>) -> AbsorbResult<()> {
    for (index, &value) in weights.iter().enumerate() {
        if !value.is_finite() {
            return Err(AbsorbError::NonFiniteWeight { index, value });
        }
        if value < 0.0 {
            return Err(AbsorbError::NegativeWeight { index, value });
        }
    }
    Ok(())
}
