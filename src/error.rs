// ABOUTME: Application-wide error types for atkmod.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::lifecycle::State;
use crate::runner::RunError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("manifest file not found: {0}")]
    ManifestNotFound(PathBuf),

    #[error("module version {0} is not supported")]
    UnsupportedVersion(String),

    #[error("module kind {0} is not supported")]
    UnsupportedKind(String),

    #[error("deployment stopped in state {state}: {source}")]
    Deployment { state: State, source: RunError },

    #[error(transparent)]
    Run(#[from] RunError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
