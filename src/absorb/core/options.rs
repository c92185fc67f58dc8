//! Configuration for multi-effect absorption.
//!
//! Purpose
//! -------
//! Carry the convergence tolerance, iteration cap, and optional-output
//! switches for the absorption driver. Configuration is explicit values
//! passed at construction: there is no environment sniffing, no global
//! state, and acceleration is a build-time feature choice, never runtime
//! detection.
//!
//! Conventions
//! -----------
//! - `tolerance` is **relative**: the driver converges when the maximum
//!   absolute change between successive full cycles falls below
//!   `tolerance · scale + ABSOLUTE_FLOOR`, where `scale` is the largest
//!   absolute entry of the input matrix. The floor keeps the threshold
//!   meaningful for matrices with near-zero scale.
use crate::absorb::errors::{AbsorbError, AbsorbResult};

/// Absolute floor added to the relative convergence threshold so that
/// near-zero input scales do not produce a vanishing (or zero) threshold.
pub const ABSOLUTE_FLOOR: f64 = 1e-12;

/// Default relative convergence tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// Default cap on full alternating-projection cycles.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// `AbsorbOptions` — validated configuration for the absorption driver.
///
/// Fields
/// ------
/// - `tolerance`: `f64`
///   Relative convergence tolerance; finite and strictly positive.
/// - `max_iterations`: `usize`
///   Cap on full cycles for K ≥ 2 absorption; at least 1. Reaching the cap
///   is reported via result metadata, never as an error.
/// - `compute_levels`: `bool`
///   When set, the driver also returns recovered per-effect level estimates
///   (exact for K = 1, best-effort for K ≥ 2).
///
/// Notes
/// -----
/// - `Default` uses `(1e-8, 1000, false)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsorbOptions {
    /// Relative convergence tolerance (finite, > 0).
    pub tolerance: f64,
    /// Maximum number of full alternating-projection cycles (>= 1).
    pub max_iterations: usize,
    /// Whether to recover per-effect fixed-effect level estimates.
    pub compute_levels: bool,
}

impl AbsorbOptions {
    /// Construct validated options, substituting defaults for `None`.
    ///
    /// Parameters
    /// ----------
    /// - `tolerance`: optional relative tolerance; must be finite and > 0
    ///   when given. Defaults to [`DEFAULT_TOLERANCE`].
    /// - `max_iterations`: optional cycle cap; must be >= 1 when given.
    ///   Defaults to [`DEFAULT_MAX_ITERATIONS`].
    /// - `compute_levels`: defaults to `false`.
    ///
    /// Errors
    /// ------
    /// - `AbsorbError::InvalidTolerance { value }` for non-finite or
    ///   non-positive tolerances.
    /// - `AbsorbError::ZeroMaxIterations` for a zero cap.
    pub fn new(
        tolerance: Option<f64>, max_iterations: Option<usize>, compute_levels: Option<bool>,
    ) -> AbsorbResult<Self> {
        let tol = tolerance.unwrap_or(DEFAULT_TOLERANCE);
        if !tol.is_finite() || tol <= 0.0 {
            return Err(AbsorbError::InvalidTolerance { value: tol });
        }
        let max_iter = max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS);
        if max_iter == 0 {
            return Err(AbsorbError::ZeroMaxIterations);
        }
        Ok(AbsorbOptions {
            tolerance: tol,
            max_iterations: max_iter,
            compute_levels: compute_levels.unwrap_or(false),
        })
    }
}

impl Default for AbsorbOptions {
    fn default() -> Self {
        AbsorbOptions {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            compute_levels: false,
        }
    }
}
