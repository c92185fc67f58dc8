//! Result type for multi-effect absorption.
//!
//! Purpose
//! -------
//! Carry the demeaned matrix together with every diagnostic the surrounding
//! regression layer needs: absorbed degrees of freedom, iteration count,
//! convergence status, the final cycle-to-cycle change, total weight, and
//! per-effect degenerate groups. Slow convergence and degenerate groups are
//! reported here as structured metadata, never raised as errors, because the
//! caller still needs a usable estimate.
//!
//! Downstream usage
//! ----------------
//! - The regression layer consumes [`TransformResult::demeaned`] (or takes
//!   ownership via [`TransformResult::into_demeaned`]) and subtracts
//!   [`TransformResult::absorbed_df`] from its residual degrees of freedom.
//! - Diagnostic accessors are cheap and safe to surface through Python
//!   bindings unchanged.
use ndarray::Array2;

/// `TransformResult` — demeaned features plus absorption diagnostics.
///
/// Fields (all behind accessors)
/// -----------------------------
/// - `demeaned`: the transformed N×M matrix; always present and finite
///   whenever the input was finite, even when the iteration cap was hit.
/// - `absorbed_df`: degrees of freedom absorbed by the effect dimensions,
///   nesting-aware (see [`Absorber`](crate::absorb::models::Absorber)).
/// - `iterations`: full alternating-projection cycles used (1 for K = 1).
/// - `converged`: whether the cycle-to-cycle change fell below the
///   threshold before the cap. `false` is a warning-grade condition, not a
///   failure.
/// - `max_abs_change`: maximum absolute entry change over the final cycle
///   (0.0 for the exact K = 1 path).
/// - `weight_total`: total sum of observation weights removed by the
///   transformation.
/// - `degenerate`: per effect, the ascending group ids with zero total
///   weight; those rows passed through unchanged.
/// - `effect_levels`: optional per-effect G×M recovered level estimates;
///   exact for K = 1, best-effort for K ≥ 2.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformResult {
    demeaned: Array2<f64>,
    absorbed_df: usize,
    iterations: usize,
    converged: bool,
    max_abs_change: f64,
    weight_total: f64,
    degenerate: Vec<Vec<usize>>,
    effect_levels: Option<Vec<Array2<f64>>>,
}

impl TransformResult {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        demeaned: Array2<f64>, absorbed_df: usize, iterations: usize, converged: bool,
        max_abs_change: f64, weight_total: f64, degenerate: Vec<Vec<usize>>,
        effect_levels: Option<Vec<Array2<f64>>>,
    ) -> Self {
        TransformResult {
            demeaned,
            absorbed_df,
            iterations,
            converged,
            max_abs_change,
            weight_total,
            degenerate,
            effect_levels,
        }
    }

    /// The demeaned feature matrix.
    pub fn demeaned(&self) -> &Array2<f64> {
        &self.demeaned
    }

    /// Consume the result, returning the demeaned matrix.
    pub fn into_demeaned(self) -> Array2<f64> {
        self.demeaned
    }

    /// Degrees of freedom absorbed by the effect dimensions
    /// (nesting-aware).
    pub fn absorbed_df(&self) -> usize {
        self.absorbed_df
    }

    /// Number of full alternating-projection cycles performed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the convergence tolerance was met before the iteration cap.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Maximum absolute entry change over the final full cycle.
    pub fn max_abs_change(&self) -> f64 {
        self.max_abs_change
    }

    /// Total sum of observation weights.
    pub fn weight_total(&self) -> f64 {
        self.weight_total
    }

    /// Per-effect group ids with zero total weight (rows left unchanged).
    pub fn degenerate(&self) -> &[Vec<usize>] {
        &self.degenerate
    }

    /// True when any effect dimension contains a degenerate group.
    pub fn has_degenerate_groups(&self) -> bool {
        self.degenerate.iter().any(|groups| !groups.is_empty())
    }

    /// Recovered per-effect level estimates, when requested via
    /// [`AbsorbOptions::compute_levels`](crate::absorb::core::AbsorbOptions).
    ///
    /// Exact for a single absorbed effect; a documented best-effort
    /// approximation for K ≥ 2, where exact recovery would require solving a
    /// sparse linear system.
    pub fn effect_levels(&self) -> Option<&[Array2<f64>]> {
        self.effect_levels.as_deref()
    }
}
