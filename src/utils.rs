#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1, PyReadonlyArray2,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Extract a 2-D float64 feature matrix from a numpy array or any object
/// exposing `to_numpy` (e.g. a pandas DataFrame).
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(raw_data: &Bound<'py, PyAny>) -> PyResult<Array2<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw_data.call_method0("to_numpy") {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro.as_array().to_owned());
        }
    }

    Err(PyValueError::new_err(
        "features must be a 2-D float64 numpy.ndarray or an object with to_numpy() returning one",
    ))
}

/// Extract an optional weight vector, defaulting to unit weights.
#[cfg(feature = "python-bindings")]
pub fn extract_weights<'py>(
    py: Python<'py>, weights: Option<&Bound<'py, PyAny>>, n_obs: usize,
) -> PyResult<Array1<f64>> {
    match weights {
        Some(raw) => {
            let arr = extract_f64_array(py, raw)?;
            let slice = arr.as_slice().map_err(|_| {
                PyValueError::new_err("weights must be a 1-D contiguous float64 array or sequence")
            })?;
            Ok(Array1::from(slice.to_vec()))
        }
        None => Ok(Array1::ones(n_obs)),
    }
}

/// Extract one effect column of integer category codes.
///
/// When `missing_sentinel` is given, entries equal to it become `None` and
/// are rejected by the engine's missing-value contract; otherwise every code
/// is treated as a valid category.
#[cfg(feature = "python-bindings")]
pub fn extract_effect_column<'py>(
    raw_column: &Bound<'py, PyAny>, missing_sentinel: Option<i64>,
) -> PyResult<Vec<Option<i64>>> {
    let codes: Vec<i64> = if let Ok(arr_ro) = raw_column.extract::<PyReadonlyArray1<i64>>() {
        arr_ro
            .as_slice()
            .map_err(|_| {
                PyValueError::new_err("effect columns must be 1-D contiguous int64 arrays")
            })?
            .to_vec()
    } else if let Ok(obj) = raw_column.call_method("to_numpy", (false,), None) {
        let series_ro = obj.extract::<PyReadonlyArray1<i64>>().map_err(|_| {
            PyValueError::new_err("effect columns must convert to 1-D int64 arrays")
        })?;
        series_ro
            .as_slice()
            .map_err(|_| {
                PyValueError::new_err("effect columns must be 1-D contiguous int64 arrays")
            })?
            .to_vec()
    } else {
        raw_column.extract().map_err(|_| {
            pyo3::exceptions::PyTypeError::new_err(
                "expected a 1-D numpy.ndarray, pandas.Series, or sequence of int64 category codes",
            )
        })?
    };

    Ok(codes
        .into_iter()
        .map(|code| match missing_sentinel {
            Some(sentinel) if code == sentinel => None,
            _ => Some(code),
        })
        .collect())
}
