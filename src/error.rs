use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Data not loaded: {0}")]
    NotLoaded(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config: {0}")]
    Config(String),

    #[error("InvalidData: {0}")]
    InvalidData(String),

    #[error("{0}")]
    General(String),
}

impl From<toml::de::Error> for NetworkError {
    fn from(err: toml::de::Error) -> Self {
        NetworkError::Config(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<NetworkError> for pyo3::PyErr {
    fn from(err: NetworkError) -> pyo3::PyErr {
        pyo3::exceptions::PyRuntimeError::new_err(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<pyo3::PyErr> for NetworkError {
    fn from(err: pyo3::PyErr) -> Self {
        NetworkError::General(err.to_string())
    }
}
