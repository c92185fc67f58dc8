//! Errors for the within-transformation (absorption) engine: structural
//! validation of panels, effect columns, group indices, and options.
//!
//! This module defines the engine-wide error type, [`AbsorbError`], and the
//! result alias [`AbsorbResult`]. It implements `Display`/`Error` and converts
//! to `PyErr` for PyO3.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Weights must be **finite and non-negative**; zero weights are legal and
//!   exclude an observation from group means without dropping its row.
//! - All variants here are **fatal and fail fast**: they are surfaced before
//!   any demeaning pass runs. Recoverable numerical conditions — degenerate
//!   groups and hitting the iteration cap — are *not* errors; they travel as
//!   diagnostics on [`TransformResult`](crate::absorb::models::TransformResult).
#[cfg(feature = "python-bindings")]
use pyo3::exceptions::PyValueError;
#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;

/// Crate-wide result alias for absorption operations that may produce
/// [`AbsorbError`].
pub type AbsorbResult<T> = Result<T, AbsorbError>;

/// Unified error type for the absorption engine.
///
/// Covers panel/effect-column validation, dimension agreement between group
/// ids, weights, and the feature matrix, and option validation. Implements
/// `Display`/`Error` and converts to a Python `ValueError` at PyO3
/// boundaries.
#[derive(Debug, Clone, PartialEq)]
pub enum AbsorbError {
    // ---- Panel / input validation ----
    /// Feature matrix has zero rows.
    EmptyPanel,

    /// Effect column has zero entries.
    EmptyEffectColumn,

    /// `absorb` was called with an empty effect list.
    NoEffects,

    /// A weight is NaN/±inf.
    NonFiniteWeight { index: usize, value: f64 },

    /// A weight is negative (zero is permitted, negative is not).
    NegativeWeight { index: usize, value: f64 },

    // ---- Effect columns ----
    /// Effect column contains a missing value the caller did not pre-clean.
    MissingEffectValue { index: usize },

    // ---- Dimension agreement ----
    /// Group id column length differs from the feature row count.
    GroupIdLengthMismatch { expected: usize, actual: usize },

    /// Weight vector length differs from the feature row count.
    WeightLengthMismatch { expected: usize, actual: usize },

    /// A pre-encoded group id lies outside `[0, n_groups)`.
    GroupIdOutOfRange { index: usize, group_id: usize, n_groups: usize },

    /// Group statistics cover a different number of groups than the index
    /// they are applied with.
    GroupCountMismatch { expected: usize, actual: usize },

    /// Group statistics cover a different number of feature columns than the
    /// matrix they are applied to.
    FeatureCountMismatch { expected: usize, actual: usize },

    // ---- Options ----
    /// Convergence tolerance must be finite and strictly positive.
    InvalidTolerance { value: f64 },

    /// Iteration cap must be at least 1.
    ZeroMaxIterations,
}

impl std::error::Error for AbsorbError {}

impl std::fmt::Display for AbsorbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Panel / input validation ----
            AbsorbError::EmptyPanel => {
                write!(f, "Panel must contain at least one observation.")
            }
            AbsorbError::EmptyEffectColumn => {
                write!(f, "Effect column must contain at least one entry.")
            }
            AbsorbError::NoEffects => {
                write!(f, "At least one effect dimension must be supplied to absorb.")
            }
            AbsorbError::NonFiniteWeight { index, value } => {
                write!(f, "Weights must be finite; index {index} has value {value}")
            }
            AbsorbError::NegativeWeight { index, value } => {
                write!(
                    f,
                    "Weights must be non-negative (zero is allowed); index {index} has value {value}"
                )
            }
            // ---- Effect columns ----
            AbsorbError::MissingEffectValue { index } => {
                write!(
                    f,
                    "Effect column contains a missing value at index {index}; drop or impute missing effect values before absorbing"
                )
            }
            // ---- Dimension agreement ----
            AbsorbError::GroupIdLengthMismatch { expected, actual } => {
                write!(f, "Group id length mismatch: expected {expected}, got {actual}")
            }
            AbsorbError::WeightLengthMismatch { expected, actual } => {
                write!(f, "Weight length mismatch: expected {expected}, got {actual}")
            }
            AbsorbError::GroupIdOutOfRange { index, group_id, n_groups } => {
                write!(
                    f,
                    "Group id {group_id} at index {index} is out of range for {n_groups} groups"
                )
            }
            AbsorbError::GroupCountMismatch { expected, actual } => {
                write!(f, "Group count mismatch: index declares {expected}, statistics cover {actual}")
            }
            AbsorbError::FeatureCountMismatch { expected, actual } => {
                write!(
                    f,
                    "Feature column mismatch: matrix has {expected}, statistics cover {actual}"
                )
            }
            // ---- Options ----
            AbsorbError::InvalidTolerance { value } => {
                write!(f, "Convergence tolerance must be finite and > 0, got {value}")
            }
            AbsorbError::ZeroMaxIterations => {
                write!(f, "Maximum iteration count must be at least 1.")
            }
        }
    }
}

/// Convert an [`AbsorbError`] into a Python `ValueError` with the error
/// message.
///
/// This is used at the Rust↔Python boundary to surface domain errors cleanly.
#[cfg(feature = "python-bindings")]
impl std::convert::From<AbsorbError> for PyErr {
    fn from(err: AbsorbError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
