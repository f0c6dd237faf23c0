//! Fingerprint de la configuración de formateo.
//!
//! Función pura `(versión de la herramienta, formatters) -> digest`. El host
//! persiste el valor (blob opaco) y lo compara con el de la invocación
//! anterior para decidir si su caché sigue siendo válida.
//!
//! Input canónico: JSON canónico de
//! `{engine_version, tool_version, formatters: [{steps, line_ending, encoding}]}`
//! en el orden recibido, hasheado con blake3.

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

use crate::constants::ENGINE_VERSION;
use crate::errors::FingerprintError;
use crate::formatter::Formatter;
use crate::hashing::{hash_bytes, to_canonical_bytes};

#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Fingerprint {
    value: Vec<u8>,
}

impl Fingerprint {
    /// "Sin configuración de formateo": valor de longitud cero.
    pub fn empty() -> Self {
        Self { value: Vec::new() }
    }

    /// Calcula el fingerprint de `formatters` para `tool_version`.
    ///
    /// Una versión vacía es un error del caller. Sin formatters, o con
    /// formatters sin steps, el resultado es `Fingerprint::empty()`.
    pub fn compute(tool_version: &str, formatters: &[Formatter]) -> Result<Self, FingerprintError> {
        if tool_version.trim().is_empty() {
            return Err(FingerprintError::MissingToolVersion);
        }
        if formatters.iter().all(Formatter::is_empty) {
            return Ok(Self::empty());
        }
        let canonical = Self::canonical_input(tool_version, formatters);
        let fingerprint = Self { value: hash_bytes(&to_canonical_bytes(&canonical)).to_vec() };
        debug!("fingerprint for {} formatter(s), tool {}: {}", formatters.len(), tool_version, fingerprint);
        Ok(fingerprint)
    }

    /// Modelo previo a canonicalizar (expuesto para diagnóstico).
    pub fn canonical_input(tool_version: &str, formatters: &[Formatter]) -> Value {
        let formatters: Vec<Value> = formatters.iter().map(Formatter::canonical_value).collect();
        json!({
            "engine_version": ENGINE_VERSION,
            "tool_version": tool_version,
            "formatters": formatters,
        })
    }

    /// Reconstruye un fingerprint persistido.
    pub fn from_bytes(value: impl Into<Vec<u8>>) -> Self {
        Self { value: value.into() }
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.value)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s.trim()).map(Self::from_bytes)
                             .map_err(|e| FingerprintError::Malformed(e.to_string()))
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
