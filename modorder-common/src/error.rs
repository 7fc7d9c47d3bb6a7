use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ModOrderError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("TOML Parsing Error: {0}")]
    Toml(#[from] Arc<toml::de::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Manifest Error: {0}")]
    Manifest(String),

    #[error("Duplicate module key '{0}'")]
    DuplicateKey(String),

    #[error("Module '{module}' depends on unknown module '{dependency}'")]
    UnknownDependency { module: String, dependency: String },
}

impl From<std::io::Error> for ModOrderError {
    fn from(err: std::io::Error) -> Self {
        ModOrderError::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for ModOrderError {
    fn from(err: serde_json::Error) -> Self {
        ModOrderError::Json(Arc::new(err))
    }
}

impl From<toml::de::Error> for ModOrderError {
    fn from(err: toml::de::Error) -> Self {
        ModOrderError::Toml(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ModOrderError>;
