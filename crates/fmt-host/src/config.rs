//! Carga de configuración del host desde variables de entorno.
//! Convención `FMT_*`; todas opcionales.

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use fmt_core::{EncodingPolicy, LineEnding};
use once_cell::sync::Lazy;

use crate::error::HostError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub const DEFAULT_INDEX_FILE: &str = ".fmtflow-index";

#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Versión de la herramienta que entra en el fingerprint.
    pub tool_version: String,
    pub line_ending: LineEnding,
    pub encoding: EncodingPolicy,
    pub index_file: PathBuf,
    /// 0 = default de rayon (un hilo por CPU).
    pub threads: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self { tool_version: env!("CARGO_PKG_VERSION").to_string(),
               line_ending: LineEnding::default(),
               encoding: EncodingPolicy::default(),
               index_file: PathBuf::from(DEFAULT_INDEX_FILE),
               threads: 0 }
    }
}

impl HostConfig {
    pub fn from_env() -> Result<Self, HostError> {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HostError>
        where F: Fn(&str) -> Option<String>
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Self::default();
        if let Some(v) = get("FMT_TOOL_VERSION") {
            cfg.tool_version = v;
        }
        if let Some(v) = get("FMT_LINE_ENDING") {
            cfg.line_ending = v.parse()?;
        }
        if let Some(v) = get("FMT_ENCODING") {
            cfg.encoding = v.parse()?;
        }
        if let Some(v) = get("FMT_INDEX_FILE") {
            cfg.index_file = PathBuf::from(v);
        }
        if let Some(v) = get("FMT_THREADS") {
            cfg.threads = v.parse().map_err(|e: std::num::ParseIntError| HostError::Env { var: "FMT_THREADS".into(),
                                                                                          reason: e.to_string() })?;
        }
        Ok(cfg)
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = HostConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.line_ending, LineEnding::Unix);
        assert_eq!(cfg.encoding.name(), "UTF-8");
        assert_eq!(cfg.index_file, PathBuf::from(DEFAULT_INDEX_FILE));
        assert_eq!(cfg.threads, 0);
        assert!(!cfg.tool_version.is_empty());
    }

    #[test]
    fn reads_every_variable() {
        let cfg = HostConfig::from_lookup(lookup(&[("FMT_TOOL_VERSION", "2.0.0"),
                                                   ("FMT_LINE_ENDING", "windows"),
                                                   ("FMT_ENCODING", "latin1"),
                                                   ("FMT_INDEX_FILE", "target/idx.json"),
                                                   ("FMT_THREADS", "3")])).unwrap();
        assert_eq!(cfg.tool_version, "2.0.0");
        assert_eq!(cfg.line_ending, LineEnding::Windows);
        assert_eq!(cfg.encoding.name(), "windows-1252");
        assert_eq!(cfg.index_file, PathBuf::from("target/idx.json"));
        assert_eq!(cfg.threads, 3);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(matches!(HostConfig::from_lookup(lookup(&[("FMT_LINE_ENDING", "sideways")])),
                         Err(HostError::Configuration(_))));
        assert!(matches!(HostConfig::from_lookup(lookup(&[("FMT_THREADS", "many")])),
                         Err(HostError::Env { .. })));
    }
}
