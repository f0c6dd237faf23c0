//! Índice incremental persistido junto al proyecto.
//!
//! Guarda el fingerprint de la configuración con la que se escribió, los
//! digests de las equality keys de cada step (para diagnosticar qué cambió)
//! y, por archivo, el digest blake3 del contenido que quedó limpio.
//!
//! Reglas:
//! - Si el fingerprint guardado difiere del actual, se descartan todas las
//!   entradas.
//! - Si algún step es never-up-to-date, ningún archivo está al día.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fmt_core::hashing::hash_bytes_hex;
use fmt_core::{Fingerprint, Formatter};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::HostError;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexFile {
    fingerprint: Fingerprint,
    #[serde(default)]
    step_digests: Vec<Vec<String>>,
    written_at: DateTime<Utc>,
    #[serde(default)]
    files: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct FileIndex {
    fingerprint: Fingerprint,
    step_digests: Vec<Vec<String>>,
    files: BTreeMap<String, String>,
    cacheable: bool,
}

impl FileIndex {
    /// Índice vacío para la configuración actual.
    pub fn fresh(tool_version: &str, formatters: &[Formatter]) -> Result<Self, HostError> {
        Ok(Self { fingerprint: Fingerprint::compute(tool_version, formatters)?,
                  step_digests: step_digests(formatters),
                  files: BTreeMap::new(),
                  cacheable: formatters.iter().all(Formatter::is_cacheable) })
    }

    /// Lee el índice en `path` y lo valida contra la configuración actual.
    /// Un archivo inexistente equivale a un índice vacío.
    pub fn load(path: &Path, tool_version: &str, formatters: &[Formatter]) -> Result<Self, HostError> {
        let mut index = Self::fresh(tool_version, formatters)?;
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no index at {}, starting empty", path.display());
                return Ok(index);
            }
            Err(e) => return Err(HostError::io(path, e)),
        };
        let stored: IndexFile = serde_json::from_slice(&raw).map_err(|e| HostError::Index { path: path.to_path_buf(),
                                                                                            reason: e.to_string() })?;
        if stored.fingerprint != index.fingerprint {
            info!("configuration changed since {} ({} -> {}), invalidating {} entries; changed steps: {:?}",
                  stored.written_at,
                  stored.fingerprint,
                  index.fingerprint,
                  stored.files.len(),
                  changed_steps(&stored.step_digests, &index.step_digests));
            return Ok(index);
        }
        index.files = stored.files;
        Ok(index)
    }

    pub fn save(&self, path: &Path) -> Result<(), HostError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| HostError::io(parent, e))?;
        }
        let stored = IndexFile { fingerprint: self.fingerprint.clone(),
                                 step_digests: self.step_digests.clone(),
                                 written_at: Utc::now(),
                                 files: self.files.clone() };
        let json = serde_json::to_vec_pretty(&stored).map_err(|e| HostError::Index { path: path.to_path_buf(),
                                                                                     reason: e.to_string() })?;
        fs::write(path, json).map_err(|e| HostError::io(path, e))?;
        debug!("index with {} entries written to {}", self.files.len(), path.display());
        Ok(())
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// `true` si `content` es exactamente lo que quedó limpio la última vez.
    pub fn is_up_to_date(&self, file: &Path, content: &[u8]) -> bool {
        self.cacheable && self.files.get(&key(file)).is_some_and(|d| *d == hash_bytes_hex(content))
    }

    /// Registra `content` como el contenido limpio de `file`.
    pub fn record(&mut self, file: &Path, content: &[u8]) {
        if self.cacheable {
            self.files.insert(key(file), hash_bytes_hex(content));
        }
    }

    pub fn forget(&mut self, file: &Path) {
        self.files.remove(&key(file));
    }
}

fn key(file: &Path) -> String {
    file.to_string_lossy().into_owned()
}

fn step_digests(formatters: &[Formatter]) -> Vec<Vec<String>> {
    formatters.iter()
              .map(|f| f.equality_keys().iter().map(|k| k.digest()).collect())
              .collect()
}

/// Pares `(formatter, step)` cuyo digest difiere o que sólo existen de un lado.
fn changed_steps(previous: &[Vec<String>], current: &[Vec<String>]) -> Vec<(usize, usize)> {
    let mut changed = Vec::new();
    for i in 0..previous.len().max(current.len()) {
        let (prev, cur) = (previous.get(i), current.get(i));
        let len = prev.map_or(0, Vec::len).max(cur.map_or(0, Vec::len));
        for j in 0..len {
            if prev.and_then(|p| p.get(j)) != cur.and_then(|c| c.get(j)) {
                changed.push((i, j));
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changed_steps_reports_positions() {
        let prev = vec![vec!["a".to_string(), "b".to_string()]];
        let cur = vec![vec!["a".to_string(), "c".to_string(), "d".to_string()], vec!["e".to_string()]];
        assert_eq!(changed_steps(&prev, &cur), vec![(0, 1), (0, 2), (1, 0)]);
        assert!(changed_steps(&cur, &cur).is_empty());
    }
}
