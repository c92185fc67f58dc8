//! rust_panel — high-performance panel-data within-transformation engine
//! with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the fixed-effects absorption engine to Python via the
//! `_rust_panel` extension module. When the `python-bindings` feature is
//! enabled, this module defines the Python-facing classes and submodules
//! used by the `rust_panel` package; the surrounding pure-Python
//! econometrics layer supplies panels and weights and receives demeaned
//! matrices plus diagnostics back.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust module ([`absorb`]) as the public crate
//!   surface.
//! - Define `#[pyclass]` wrappers ([`Absorb`], [`AbsorbOutcome`]) and the
//!   `#[pymodule]` initializer for the `_rust_panel` extension.
//! - Register the `absorb` submodule under `rust_panel` in `sys.modules` so
//!   dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is implemented in [`absorb`]; this file
//!   performs only FFI glue, input extraction, and error mapping.
//! - Whether the accelerated engine is present is a **build-time feature
//!   choice** (`python-bindings` on the cdylib), never runtime detection:
//!   the Python layer imports `_rust_panel` or falls back to its own pure
//!   implementation at packaging time.
//! - On successful conversion from Python objects to Rust types, the
//!   invariants documented in [`absorb`] hold (validated containers,
//!   in-range group ids).
//!
//! Conventions
//! -----------
//! - Python-exposed classes live under `_rust_panel.absorb` and are
//!   typically wrapped by thin pure-Python facades.
//! - Effect columns cross the boundary as int64 category codes with an
//!   optional missing sentinel; feature matrices and weights as float64
//!   arrays. Indexing is 0-based on both sides.
//! - Errors from core Rust code are propagated as [`absorb::AbsorbError`] values
//!   internally and converted to `ValueError` at the PyO3 boundary; slow
//!   convergence and degenerate groups are reported on the outcome object,
//!   never raised.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on [`absorb`] (or its
//!   `prelude`) and can ignore the PyO3 items guarded by the
//!   `python-bindings` feature.
//! - The Python packaging layer imports the `_rust_panel` module defined
//!   here and wraps its classes in user-facing APIs.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in [`absorb`] and by
//!   `tests/integration_absorb_pipeline.rs`; binding smoke tests live on
//!   the Python side.

pub mod absorb;
pub mod utils;

#[cfg(feature = "python-bindings")]
use ndarray::Array2;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    absorb::{
        core::{AbsorbOptions, PanelData},
        models::{Absorber, TransformResult},
    },
    utils::{extract_effect_column, extract_f64_matrix, extract_weights},
};

/// Absorb — Python-facing handle over the absorption engine.
///
/// Mirrors [`Absorber`]: construction validates the convergence options
/// once; `transform` runs the within-transformation on a feature matrix,
/// effect columns, and optional weights.
#[cfg(feature = "python-bindings")]
#[pyclass]
pub struct Absorb {
    absorber: Absorber,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Absorb {
    /// Create an absorber.
    ///
    /// Parameters
    /// ----------
    /// - `tolerance`: relative convergence tolerance (default 1e-8).
    /// - `max_iterations`: cap on full projection cycles (default 1000).
    /// - `compute_levels`: also recover per-effect level estimates
    ///   (default False; exact for one effect, best-effort otherwise).
    #[new]
    #[pyo3(signature = (tolerance=None, max_iterations=None, compute_levels=None))]
    fn new(
        tolerance: Option<f64>, max_iterations: Option<usize>, compute_levels: Option<bool>,
    ) -> PyResult<Self> {
        let options = AbsorbOptions::new(tolerance, max_iterations, compute_levels)?;
        Ok(Absorb { absorber: Absorber::new(options) })
    }

    /// Demean `features` by the given effect columns.
    ///
    /// Parameters
    /// ----------
    /// - `features`: 2-D float64 array (observations × columns).
    /// - `effects`: sequence of 1-D int64 category-code columns.
    /// - `weights`: optional 1-D float64 observation weights (default all
    ///   1.0).
    /// - `missing_sentinel`: optional code marking missing effect values;
    ///   its presence in any column raises `ValueError` per the engine's
    ///   pre-cleaning contract.
    ///
    /// Returns
    /// -------
    /// [`AbsorbOutcome`] with the demeaned matrix and diagnostics.
    #[pyo3(signature = (features, effects, weights=None, missing_sentinel=None))]
    fn transform<'py>(
        &self, py: Python<'py>, features: &Bound<'py, PyAny>, effects: Vec<Bound<'py, PyAny>>,
        weights: Option<&Bound<'py, PyAny>>, missing_sentinel: Option<i64>,
    ) -> PyResult<AbsorbOutcome> {
        let feature_matrix = extract_f64_matrix(features)?;
        let weight_vec = extract_weights(py, weights, feature_matrix.nrows())?;
        let panel = PanelData::new(feature_matrix, weight_vec)?;

        let mut columns = Vec::with_capacity(effects.len());
        for raw_column in &effects {
            columns.push(extract_effect_column(raw_column, missing_sentinel)?);
        }

        let result = self.absorber.absorb_columns(&panel, &columns)?;
        Ok(AbsorbOutcome { result })
    }
}

/// AbsorbOutcome — Python-facing view of a [`TransformResult`].
///
/// Exposes the demeaned matrix and every diagnostic as read-only
/// attributes; arrays are copied into fresh NumPy arrays on access.
#[cfg(feature = "python-bindings")]
#[pyclass]
pub struct AbsorbOutcome {
    result: TransformResult,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl AbsorbOutcome {
    /// The demeaned feature matrix.
    #[getter]
    fn demeaned<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        self.result.demeaned().clone().into_pyarray(py)
    }

    /// Degrees of freedom absorbed by the effect dimensions.
    #[getter]
    fn absorbed_df(&self) -> usize {
        self.result.absorbed_df()
    }

    /// Full alternating-projection cycles performed.
    #[getter]
    fn iterations(&self) -> usize {
        self.result.iterations()
    }

    /// Whether the tolerance was met before the iteration cap.
    #[getter]
    fn converged(&self) -> bool {
        self.result.converged()
    }

    /// Maximum absolute entry change over the final cycle.
    #[getter]
    fn max_abs_change(&self) -> f64 {
        self.result.max_abs_change()
    }

    /// Total sum of observation weights.
    #[getter]
    fn weight_total(&self) -> f64 {
        self.result.weight_total()
    }

    /// Per-effect group ids with zero total weight (rows left unchanged).
    #[getter]
    fn degenerate(&self) -> Vec<Vec<usize>> {
        self.result.degenerate().to_vec()
    }

    /// Recovered per-effect level estimates, when requested.
    #[getter]
    fn effect_levels<'py>(&self, py: Python<'py>) -> Option<Vec<Bound<'py, PyArray2<f64>>>> {
        self.result.effect_levels().map(|levels| {
            levels
                .iter()
                .map(|level: &Array2<f64>| level.clone().into_pyarray(py))
                .collect()
        })
    }
}

/// _rust_panel — PyO3 module initializer for the Python extension.
///
/// Creates the `absorb` submodule, attaches it to the parent `_rust_panel`
/// module, and registers it in `sys.modules` so it is importable via a
/// dotted path from Python. Invoked automatically on import; never called
/// by user code.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_panel<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let absorb_mod = PyModule::new(_py, "absorb")?;
    absorb(_py, m, &absorb_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("rust_panel.absorb", absorb_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn absorb<'py>(
    _py: Python, rust_panel: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<Absorb>()?;
    m.add_class::<AbsorbOutcome>()?;
    rust_panel.add_submodule(m)?;
    Ok(())
}
