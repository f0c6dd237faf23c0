//! Versión de la herramienta desde el modelo de build del proyecto.
//!
//! El plugin de formateo se busca primero entre los plugins declarados y
//! después en la sección de plugin management; la primera versión no vacía
//! gana. Si no aparece en ninguna de las dos, el fingerprint no se puede
//! calcular.

use fmt_core::{Fingerprint, FingerprintError, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl PluginDescriptor {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>, version: Option<&str>) -> Self {
        Self { group_id: group_id.into(),
               artifact_id: artifact_id.into(),
               version: version.map(str::to_string) }
    }

    fn is(&self, group_id: &str, artifact_id: &str) -> bool {
        self.group_id == group_id && self.artifact_id == artifact_id
    }

    fn declared_version(&self) -> Option<&str> {
        self.version.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildModel {
    #[serde(default)]
    pub plugins: Vec<PluginDescriptor>,
    #[serde(default)]
    pub plugin_management: Vec<PluginDescriptor>,
}

impl BuildModel {
    pub fn resolve_tool_version(&self, group_id: &str, artifact_id: &str) -> Result<String, FingerprintError> {
        self.plugins
            .iter()
            .chain(&self.plugin_management)
            .filter(|p| p.is(group_id, artifact_id))
            .find_map(PluginDescriptor::declared_version)
            .map(str::to_string)
            .ok_or_else(|| FingerprintError::PluginAbsent(artifact_id.to_string()))
    }

    /// Fingerprint de una unidad de build: versión resuelta + sus formatters.
    pub fn unit_fingerprint(&self,
                            group_id: &str,
                            artifact_id: &str,
                            formatters: &[Formatter])
                            -> Result<Fingerprint, FingerprintError> {
        let version = self.resolve_tool_version(group_id, artifact_id)?;
        Fingerprint::compute(&version, formatters)
    }
}
