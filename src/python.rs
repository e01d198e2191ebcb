use std::path::Path;

use pyo3::prelude::*;

use crate::{from_file, to_csv, to_json, BcsvTable, HashDictionary, IoOptions};

/// A Python wrapper for a decoded BcsvTable.
#[pyclass(name = "BcsvFile")]
pub struct PyBcsvFile {
    inner: BcsvTable,
}

#[pymethods]
impl PyBcsvFile {
    /// Decode a BCSV file with the bundled dictionary.
    #[staticmethod]
    pub fn from_file(bcsv_path: &str) -> PyResult<Self> {
        let table = from_file(HashDictionary::shared(), Path::new(bcsv_path), &IoOptions::default())
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyIOError, _>(e.to_string()))?;

        Ok(PyBcsvFile { inner: table })
    }

    /// Write the table to a JSON file.
    pub fn to_json(&self, path: &str) -> PyResult<()> {
        to_json(&self.inner, Path::new(path))
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyIOError, _>(e.to_string()))?;
        Ok(())
    }

    /// Write the table to a CSV file.
    pub fn to_csv(&self, path: &str) -> PyResult<()> {
        to_csv(&self.inner, Path::new(path), false)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyIOError, _>(e.to_string()))?;
        Ok(())
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Get the number of fields.
    pub fn num_fields(&self) -> usize {
        self.inner.num_fields()
    }

    /// Column names of the first entry.
    pub fn column_names(&self) -> Vec<String> {
        self.inner
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// A Python module implemented in Rust.
#[pymodule]
fn bcsv_parse(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyBcsvFile>()?;
    Ok(())
}
