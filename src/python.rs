use std::collections::HashMap;

use pyo3::prelude::*;
use pyo3::types::PyModule;
use pyo3_polars::PyDataFrame;

use crate::config::AnalysisConfig;
use crate::error::NetworkError;
use crate::model::NetworkModel;
use crate::schema;
use crate::visualization;

#[pyclass(name = "MusicianNetwork")]
pub struct PyMusicianNetwork {
    model: NetworkModel,
}

#[pymethods]
impl PyMusicianNetwork {
    #[new]
    #[pyo3(signature = (base_path, config_path=None))]
    fn new(base_path: String, config_path: Option<String>) -> PyResult<Self> {
        let config = match config_path {
            Some(path) => AnalysisConfig::from_toml_file(path)?,
            None => AnalysisConfig::default(),
        };
        Ok(Self {
            model: NetworkModel::new(base_path, config),
        })
    }

    /// Load a catalog CSV (relative to base_path). Returns the record count.
    #[pyo3(signature = (filename, rename=None))]
    fn load_csv(
        &mut self,
        filename: &str,
        rename: Option<HashMap<String, String>>,
    ) -> PyResult<usize> {
        let catalog = self.model.load_csv(filename, rename.as_ref())?;
        Ok(catalog.len())
    }

    /// Load a catalog from a Polars DataFrame. Returns the record count.
    fn load_catalog(&mut self, df: PyDataFrame) -> PyResult<usize> {
        let catalog = self.model.load_dataframe(&df.0)?;
        Ok(catalog.len())
    }

    fn relations_df(&self) -> PyResult<PyDataFrame> {
        Ok(PyDataFrame(self.model.relations()?.to_dataframe()?))
    }

    fn triples_df(&self) -> PyResult<PyDataFrame> {
        Ok(PyDataFrame(self.model.relations()?.triples()?))
    }

    fn network_json(&self) -> PyResult<String> {
        let network = self.model.network()?;
        Ok(serde_json::to_string(&network).map_err(NetworkError::from)?)
    }

    fn musician_stats_json(&self) -> PyResult<String> {
        let stats = self.model.musician_stats()?;
        Ok(serde_json::to_string(&stats).map_err(NetworkError::from)?)
    }

    fn search_musicians_json(&self, query: &str) -> PyResult<String> {
        let hits = self.model.search_musicians(query)?;
        Ok(serde_json::to_string(&hits).map_err(NetworkError::from)?)
    }

    /// Self-contained HTML report. Use with `IPython.display.HTML(...)` in Jupyter.
    fn report_html(&self) -> PyResult<String> {
        let report = self.model.report()?;
        Ok(visualization::generate_report_html(&report)?)
    }
}

/// Export catalog column names as a Python submodule
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let columns = PyModule::new(m.py(), "columns")?;
    columns.add("ARTIST", schema::catalog::ARTIST)?;
    columns.add("ALBUM", schema::catalog::ALBUM)?;
    columns.add("MUSICIANS", schema::catalog::MUSICIANS)?;
    columns.add("GENRES", schema::catalog::GENRES)?;
    columns.add("STYLES", schema::catalog::STYLES)?;
    m.add_submodule(&columns)?;
    Ok(())
}

#[pymodule]
fn musician_network(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMusicianNetwork>()?;
    add_schema_exports(m)?;
    Ok(())
}
