//! Errores del core.
//!
//! - `StepError`: lo que devuelve un step al aplicar su transformación.
//! - `FormatError`: fallo por archivo (aislado; el host sigue con el resto).
//! - `ConfigurationError`: fallo al construir steps/políticas, antes de
//!   procesar cualquier archivo.
//! - `FingerprintError`: precondiciones del cálculo de fingerprint.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StepError {
    #[error("{0}")]
    Failed(String),
    #[error("fence '{fence}': expected {expected} region(s) after formatting, found {found}")]
    FenceMismatch { fence: String, expected: usize, found: usize },
    #[error("step '{step}': {source}")]
    Inner { step: String, source: Box<StepError> },
}

impl StepError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FormatError {
    #[error("step '{step}' failed on {file}: {source}")]
    StepFailed { step: String, file: String, source: StepError },
    #[error("cannot decode {file} as {encoding}")]
    Decode { encoding: String, file: String },
    #[error("cannot encode {file} as {encoding}")]
    Encode { encoding: String, file: String },
}

impl FormatError {
    /// Nombre del step que falló, si el error proviene de un step.
    pub fn step(&self) -> Option<&str> {
        match self {
            Self::StepFailed { step, .. } => Some(step),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigurationError {
    #[error("option '{option}' requires version {required} or newer, but {actual} is configured")]
    UnsupportedOption { option: String, required: String, actual: String },
    #[error("invalid version: {0}")]
    InvalidVersion(String),
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("invalid value for '{option}': {reason}")]
    InvalidValue { option: String, reason: String },
    #[error("unknown line ending policy: {0}")]
    UnknownLineEnding(String),
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),
    #[error("encoding {0} cannot be used for output")]
    UnsupportedEncoding(String),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FingerprintError {
    #[error("tool version is missing or blank")]
    MissingToolVersion,
    #[error("{0} plugin absent from the project")]
    PluginAbsent(String),
    #[error("malformed fingerprint: {0}")]
    Malformed(String),
}
