//! Multi-effect absorption driver: alternating projection across effect
//! dimensions.
//!
//! Purpose
//! -------
//! Orchestrate repeated application of the within-transform kernel across
//! one or more effect dimensions, decide convergence, compute the absorbed
//! degrees of freedom (nesting-aware), and optionally recover fixed-effect
//! level estimates.
//!
//! ## Algorithm
//! - K = 1: one statistics pass plus one subtraction — exact, no iteration.
//!   `iterations = 1`, `converged = true`, `max_abs_change = 0`.
//! - K ≥ 2: iterative demeaning. Each full cycle demeans by effect 1, then
//!   effect 2, … then effect K, recomputing group statistics from the
//!   current residuals each time (they change every step). After each cycle
//!   the maximum absolute entry change against the previous cycle's output
//!   is compared with `tolerance · scale + ABSOLUTE_FLOOR`, where `scale`
//!   is the largest absolute entry of the input. Hitting the iteration cap
//!   returns the partially-converged matrix with `converged = false` —
//!   a warning-grade condition, because callers can usually tolerate
//!   approximate absorption.
//!
//! ## Degrees of freedom
//! `absorbed_df = Σ G_k − 1` over the effects not spanned by a finer effect
//! (pairwise O(N) refinement checks, see
//! [`nesting`](crate::absorb::core::nesting)). For two crossed effects this
//! is `G₁ + G₂ − 1`; for a single effect `G − 1`; for B strictly nested in
//! A it collapses to `G_B − 1`. The K = 2 behavior is authoritative and
//! K > 2 generalizes via the pairwise checks; validation against reference
//! outputs beyond K = 2 is an open follow-up.
//!
//! ## State machine
//! NOT_STARTED → ITERATING (K ≥ 2 only) → CONVERGED | MAX_ITER_REACHED.
//! Both terminal states return a usable [`TransformResult`]; only the
//! metadata differs.
//!
//! ## Determinism & concurrency
//! The driver is pure and stateless per call: it borrows the panel
//! read-only and emits a fresh matrix. All passes are sequential and
//! index-ordered, so results are bitwise reproducible run to run, and
//! independent calls may run concurrently with no shared state.
use crate::absorb::core::data::PanelData;
use crate::absorb::core::encoder::{GroupIndex, encode_groups_checked};
use crate::absorb::core::nesting::redundant_effects;
use crate::absorb::core::options::{ABSOLUTE_FLOOR, AbsorbOptions};
use crate::absorb::core::stats::GroupStats;
use crate::absorb::core::validation::validate_dimensions;
use crate::absorb::core::within::demean_in_place;
use crate::absorb::errors::{AbsorbError, AbsorbResult};
use crate::absorb::models::outcome::TransformResult;
use ndarray::Array2;
use std::hash::Hash;

/// `Absorber` — configured entry point for fixed-effects absorption.
///
/// Holds validated [`AbsorbOptions`] and exposes [`Absorber::absorb`] over
/// pre-encoded effect columns plus [`Absorber::absorb_columns`] over raw
/// categorical columns. Construction is cheap; one instance may serve any
/// number of independent panels.
#[derive(Debug, Clone, Copy, Default)]
pub struct Absorber {
    options: AbsorbOptions,
}

impl Absorber {
    /// Construct an absorber with the given options.
    pub fn new(options: AbsorbOptions) -> Self {
        Absorber { options }
    }

    /// The options this absorber runs with.
    pub fn options(&self) -> &AbsorbOptions {
        &self.options
    }

    /// Absorb raw categorical effect columns from a panel.
    ///
    /// Each column is encoded in first-seen order via
    /// [`encode_groups_checked`]; `None` entries (missing effect values) are
    /// rejected before any computation. See [`Absorber::absorb`] for the
    /// transformation itself.
    pub fn absorb_columns<K>(
        &self, panel: &PanelData, columns: &[Vec<Option<K>>],
    ) -> AbsorbResult<TransformResult>
    where
        K: Eq + Hash + Clone,
    {
        let mut effects = Vec::with_capacity(columns.len());
        for column in columns {
            effects.push(encode_groups_checked(column)?);
        }
        self.absorb(panel, &effects)
    }

    /// Absorb one or more encoded effect dimensions from a panel.
    ///
    /// Parameters
    /// ----------
    /// - `panel`: validated features + weights; borrowed read-only, never
    ///   mutated.
    /// - `effects`: ordered encoded effect columns. Order fixes the cycle
    ///   order for K ≥ 2 but not the converged fixed point.
    ///
    /// Returns
    /// -------
    /// `AbsorbResult<TransformResult>`
    ///   - `Ok` with the demeaned matrix and diagnostics; also when the
    ///     iteration cap was reached (`converged = false`).
    ///   - `Err(AbsorbError)` only for structural problems (empty effect
    ///     list, dimension mismatches), surfaced before any computation.
    ///
    /// Errors
    /// ------
    /// - `AbsorbError::NoEffects` for an empty effect list.
    /// - `AbsorbError::GroupIdLengthMismatch` when any effect column length
    ///   differs from the panel row count.
    pub fn absorb(
        &self, panel: &PanelData, effects: &[GroupIndex],
    ) -> AbsorbResult<TransformResult> {
        if effects.is_empty() {
            return Err(AbsorbError::NoEffects);
        }
        let features = panel.features.view();
        let weights = panel.weights.view();
        for index in effects {
            validate_dimensions(index, &weights, &features)?;
        }

        let weight_total = panel.weights.sum();
        let n_cols = panel.n_features();
        let mut levels = self.options.compute_levels.then(|| {
            effects
                .iter()
                .map(|index| Array2::<f64>::zeros((index.n_groups, n_cols)))
                .collect::<Vec<_>>()
        });
        let mut degenerate: Vec<Vec<usize>> = vec![Vec::new(); effects.len()];

        let mut current = panel.features.clone();

        let (iterations, converged, max_abs_change) = if effects.len() == 1 {
            // Exact single-effect path: one accumulation, one subtraction.
            let index = &effects[0];
            let stats = GroupStats::compute_unchecked(index, &weights, &current.view());
            degenerate[0] = stats.degenerate.clone();
            if let Some(levels) = &mut levels {
                levels[0] += &stats.mean;
            }
            demean_in_place(&mut current.view_mut(), index, &stats);
            (1, true, 0.0)
        } else {
            self.iterate(panel, effects, &mut current, &mut degenerate, &mut levels)
        };

        let absorbed_df = absorbed_degrees_of_freedom(effects);

        Ok(TransformResult::new(
            current,
            absorbed_df,
            iterations,
            converged,
            max_abs_change,
            weight_total,
            degenerate,
            levels,
        ))
    }

    /// Alternating-projection loop for K ≥ 2 effects.
    ///
    /// Writes the running residual into `current`, fills `degenerate` from
    /// the first cycle (group weight totals never change across cycles),
    /// and accumulates subtracted means into `levels` when requested.
    /// Returns `(iterations, converged, max_abs_change)`.
    fn iterate(
        &self, panel: &PanelData, effects: &[GroupIndex], current: &mut Array2<f64>,
        degenerate: &mut [Vec<usize>], levels: &mut Option<Vec<Array2<f64>>>,
    ) -> (usize, bool, f64) {
        let weights = panel.weights.view();
        let scale = panel.features.iter().fold(0.0_f64, |acc, &v| acc.max(v.abs()));
        let threshold = self.options.tolerance * scale + ABSOLUTE_FLOOR;

        let mut previous = current.clone();
        let mut iterations = 0;
        let mut converged = false;
        let mut max_abs_change = f64::INFINITY;

        while iterations < self.options.max_iterations {
            previous.assign(current);
            for (e, index) in effects.iter().enumerate() {
                let stats = GroupStats::compute_unchecked(index, &weights, &current.view());
                if iterations == 0 {
                    degenerate[e] = stats.degenerate.clone();
                }
                if let Some(levels) = levels {
                    levels[e] += &stats.mean;
                }
                demean_in_place(&mut current.view_mut(), index, &stats);
            }
            iterations += 1;

            max_abs_change = current
                .iter()
                .zip(previous.iter())
                .fold(0.0_f64, |acc, (&a, &b)| acc.max((a - b).abs()));
            if max_abs_change <= threshold {
                converged = true;
                break;
            }
        }

        (iterations, converged, max_abs_change)
    }
}

/// Nesting-aware absorbed degrees of freedom.
///
/// Sums the distinct-group counts of every effect not spanned by a finer
/// effect, then subtracts 1 for the single absorbed constant (counted once
/// regardless of how many effects are absorbed):
///
/// - one effect: `G − 1`
/// - two crossed effects: `G₁ + G₂ − 1`
/// - B strictly nested in A: `G_A + (G_B − G_A) − 1 = G_B − 1`
fn absorbed_degrees_of_freedom(effects: &[GroupIndex]) -> usize {
    let refs: Vec<&GroupIndex> = effects.iter().collect();
    let redundant = redundant_effects(&refs);
    let total: usize = effects
        .iter()
        .zip(redundant.iter())
        .filter(|(_, &skip)| !skip)
        .map(|(index, _)| index.n_groups)
        .sum();
    total.saturating_sub(1)
}
