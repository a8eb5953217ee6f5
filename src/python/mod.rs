//! Python bindings
//!
//! Exposes the two-pool model with the dictionary-in, arrays-out interface
//! used from notebooks:
//!
//! ```python
//! from soilc._lib import run
//! rh, cpools = run(params, pd.DataFrame({"LITTER_TEMP": ..., "SOIL_TEMP": ..., ...}))
//! ```

use crate::{ForcingData, SoilCError, TwoPoolDecomposition, TwoPoolParameters};
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray1};
use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::IntoPyDict;
use soilc_core::forcing::REQUIRED_COLUMNS;
use std::collections::HashMap;

/// Missing keys surface as `KeyError`, everything else as `ValueError`.
fn to_py_err(err: SoilCError) -> PyErr {
    match err {
        SoilCError::MissingParameter(_) | SoilCError::MissingForcingColumn(_) => {
            PyKeyError::new_err(err.to_string())
        }
        _ => PyValueError::new_err(err.to_string()),
    }
}

/// Read the required columns from anything indexable by column name.
///
/// Accepts a pandas DataFrame as well as a dict. Each column goes through
/// `numpy.asarray(column, dtype="float64")`, so integer columns, lists and
/// Series are all accepted. Extra columns are ignored.
fn forcing_from_table(input_data: &Bound<'_, PyAny>) -> PyResult<ForcingData> {
    let py = input_data.py();
    let numpy = py.import_bound("numpy")?;
    let as_float = [("dtype", "float64")].into_py_dict_bound(py);

    let mut columns = HashMap::with_capacity(REQUIRED_COLUMNS.len());
    for name in REQUIRED_COLUMNS {
        let column = match input_data.get_item(name) {
            Ok(column) => column,
            Err(err) if err.is_instance_of::<PyKeyError>(py) => {
                return Err(to_py_err(SoilCError::MissingForcingColumn(name.to_string())))
            }
            Err(err) => return Err(err),
        };
        let values = numpy.call_method("asarray", (column,), Some(&as_float))?;
        let values: PyReadonlyArray1<'_, f64> = values.extract()?;
        columns.insert(name.to_string(), values.as_array().to_vec());
    }
    ForcingData::from_columns(&columns).map_err(to_py_err)
}

/// Run the two-pool decomposition model.
///
/// `input_data` is a pandas DataFrame or a dict of columns.
///
/// Returns `(Rh, Cpools)` as arrays of shape `(N, 2)` and `(N + 1, 2)`,
/// columns ordered litter then soil.
#[pyfunction]
#[pyo3(name = "run", signature = (params, input_data, check = false))]
fn py_run<'py>(
    py: Python<'py>,
    params: HashMap<String, f64>,
    input_data: &Bound<'py, PyAny>,
    check: bool,
) -> PyResult<(Bound<'py, PyArray2<f64>>, Bound<'py, PyArray2<f64>>)> {
    let parameters = TwoPoolParameters::from_map(&params).map_err(to_py_err)?;
    let forcing = forcing_from_table(input_data)?;
    let component = TwoPoolDecomposition::from_parameters(parameters);

    let results = py
        .allow_threads(|| {
            if check {
                component.run_checked(&forcing)
            } else {
                Ok(component.run(&forcing))
            }
        })
        .map_err(to_py_err)?;

    Ok((
        results.respiration_array().into_pyarray_bound(py),
        results.carbon_pools_array().into_pyarray_bound(py),
    ))
}

/// Raise `ValueError` if the parameters violate the mass balance bounds.
#[pyfunction]
fn validate_parameters(params: HashMap<String, f64>) -> PyResult<()> {
    TwoPoolParameters::from_map(&params)
        .and_then(|parameters| parameters.validate())
        .map_err(to_py_err)
}

#[pymodule]
#[pyo3(name = "_lib")]
pub fn soilc(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_function(wrap_pyfunction!(py_run, m)?)?;
    m.add_function(wrap_pyfunction!(validate_parameters, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use numpy::PyArrayMethods;
    use pyo3::types::PyDict;

    fn params() -> HashMap<String, f64> {
        HashMap::from([
            ("C_litter_t0".to_string(), 100.0),
            ("C_soil_t0".to_string(), 500.0),
            ("dt".to_string(), 1.0),
            ("tau_litter".to_string(), 2.0),
            ("tau_soil".to_string(), 50.0),
            ("Q10".to_string(), 2.0),
            ("Tref".to_string(), 10.0),
            ("Wf_min".to_string(), 0.1),
            ("Wf_max".to_string(), 1.0),
            ("Wf_m".to_string(), -0.1),
            ("Wf_x0".to_string(), 0.5),
            ("Me_litter".to_string(), 0.3),
            ("Me_soil".to_string(), 0.2),
        ])
    }

    /// Evaluate `expr` with numpy bound to `np` and pandas (if installed) to `pd`.
    fn eval<'py>(py: Python<'py>, expr: &str) -> PyResult<Bound<'py, PyAny>> {
        let globals = PyDict::new_bound(py);
        globals.set_item("np", py.import_bound("numpy")?)?;
        if let Ok(pandas) = py.import_bound("pandas") {
            globals.set_item("pd", pandas)?;
        }
        py.eval_bound(expr, Some(&globals), None)
    }

    fn assert_reference_step(
        rh: &Bound<'_, PyArray2<f64>>,
        cpools: &Bound<'_, PyArray2<f64>>,
    ) {
        let rh = rh.readonly();
        let cpools = cpools.readonly();
        let rh = rh.as_array();
        let cpools = cpools.as_array();

        assert_eq!(rh.shape(), &[2, 2]);
        assert_eq!(cpools.shape(), &[3, 2]);
        assert!((rh[[0, 0]] - 35.0).abs() < 1e-10);
        assert!((rh[[0, 1]] - 8.0).abs() < 1e-10);
        assert!((cpools[[1, 0]] - 62.0).abs() < 1e-10);
        assert!((cpools[[1, 1]] - 505.0).abs() < 1e-10);
    }

    #[test]
    fn test_run_accepts_integer_columns() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let input_data = eval(
                py,
                "{'LITTER_TEMP': np.array([10, 10]), 'SOIL_TEMP': [10.0, 10.0], \
                  'LITTER_MOIST': np.array([0.5, 0.5]), 'SOIL_MOIST': np.array([0.5, 0.5]), \
                  'LITTER_INPUT': np.array([10, 10]), 'SITE': np.array([1, 1])}",
            )
            .unwrap();

            let (rh, cpools) = py_run(py, params(), &input_data, false).unwrap();
            assert_reference_step(&rh, &cpools);
        });
    }

    #[test]
    fn test_run_accepts_dataframe() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            if py.import_bound("pandas").is_err() {
                eprintln!("pandas is not installed, skipping");
                return;
            }
            let input_data = eval(
                py,
                "pd.DataFrame({'LITTER_TEMP': [10.0, 10.0], 'SOIL_TEMP': [10.0, 10.0], \
                  'LITTER_MOIST': [0.5, 0.5], 'SOIL_MOIST': [0.5, 0.5], \
                  'LITTER_INPUT': [10, 10]})",
            )
            .unwrap();

            let (rh, cpools) = py_run(py, params(), &input_data, false).unwrap();
            assert_reference_step(&rh, &cpools);
        });
    }

    #[test]
    fn test_missing_column_is_key_error() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let input_data = eval(
                py,
                "{'LITTER_TEMP': [10.0], 'SOIL_TEMP': [10.0], 'LITTER_MOIST': [0.5], \
                  'LITTER_INPUT': [10.0]}",
            )
            .unwrap();

            let err = py_run(py, params(), &input_data, false).unwrap_err();
            assert!(err.is_instance_of::<PyKeyError>(py));
            assert!(err.to_string().contains("SOIL_MOIST"), "{}", err);
        });
    }

    #[test]
    fn test_mismatched_columns_are_value_errors() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let input_data = eval(
                py,
                "{'LITTER_TEMP': [10.0, 10.0], 'SOIL_TEMP': [10.0], 'LITTER_MOIST': [0.5], \
                  'SOIL_MOIST': [0.5], 'LITTER_INPUT': [10.0]}",
            )
            .unwrap();

            let err = py_run(py, params(), &input_data, false).unwrap_err();
            assert!(err.is_instance_of::<PyValueError>(py));
        });
    }
}
