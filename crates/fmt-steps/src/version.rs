//! Versiones numéricas con puntos (`0.57`, `1.2.3`) de librerías envueltas.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use fmt_core::ConfigurationError;
use serde::{Serialize, Serializer};

/// Se compara componente a componente; los componentes faltantes valen 0
/// (`0.57 == 0.57.0`). Se serializa en forma canónica, así que versiones
/// iguales dan la misma equality key.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    parts: Vec<u64>,
}

impl Version {
    pub fn parse(raw: &str) -> Result<Self, ConfigurationError> {
        let raw = raw.trim();
        let parts = raw.split('.')
                       .map(|p| p.parse::<u64>())
                       .collect::<Result<Vec<_>, _>>()
                       .map_err(|_| ConfigurationError::InvalidVersion(raw.to_string()))?;
        Ok(Self { raw: raw.to_string(),
                  parts })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Componentes sin ceros finales: `0.57.0` -> `0.57`, `0.0` -> `0`.
    pub fn canonical(&self) -> String {
        let len = self.parts.iter().rposition(|p| *p != 0).map_or(1, |i| i + 1);
        self.parts[..len].iter().map(u64::to_string).collect::<Vec<_>>().join(".")
    }

    fn part(&self, i: usize) -> u64 {
        self.parts.get(i).copied().unwrap_or(0)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len).map(|i| self.part(i).cmp(&other.part(i)))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Version {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical())
    }
}
