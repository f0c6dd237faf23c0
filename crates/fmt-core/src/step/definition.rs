use std::fmt;
use std::path::Path;

use crate::constants::IN_MEMORY_FILE;
use crate::equality::EqualityKey;
use crate::errors::StepError;

/// Contexto de una llamada a `apply`. Metadata de sólo lectura: el engine no
/// la interpreta, algunos steps sí (p. ej. para resolver rutas relativas).
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatContext<'a> {
    pub file: Option<&'a Path>,
    pub root: Option<&'a Path>,
}

impl<'a> FormatContext<'a> {
    pub fn new(file: Option<&'a Path>, root: Option<&'a Path>) -> Self {
        Self { file, root }
    }

    /// Identidad del archivo para mensajes de error.
    pub fn display_file(&self) -> String {
        self.file.map(|p| p.display().to_string()).unwrap_or_else(|| IN_MEMORY_FILE.to_string())
    }
}

/// Trait que define un Step. Implementaciones deben ser puras respecto al
/// texto de entrada + su propia configuración, e inmutables tras construirse:
/// el host comparte una misma instancia entre hilos.
pub trait FormatterStep: Send + Sync + fmt::Debug {
    /// Nombre estable del step; aparece en errores y en la equality key.
    fn name(&self) -> &str;

    /// Transforma `unix` (finales de línea `\n`). La salida puede contener
    /// otros finales; el engine la vuelve a normalizar.
    fn apply(&self, unix: &str, ctx: &FormatContext<'_>) -> Result<String, StepError>;

    /// Key canónica de la configuración del step.
    fn equality_key(&self) -> EqualityKey;
}
