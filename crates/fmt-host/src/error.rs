//! Errores del host. Los fallos por archivo no llegan aquí: el batch los
//! aísla en `FileOutcome::Failed`.

use std::path::PathBuf;

use fmt_core::{ConfigurationError, FingerprintError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("io error on {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("malformed index {}: {reason}", path.display())]
    Index { path: PathBuf, reason: String },
    #[error("invalid environment variable {var}: {reason}")]
    Env { var: String, reason: String },
    #[error("cannot build worker pool: {0}")]
    Pool(String),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),
}

impl HostError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(),
                   source }
    }
}
