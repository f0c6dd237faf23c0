//! Constantes del motor core.
//!
//! Este módulo agrupa valores estáticos que participan en el cálculo de
//! fingerprints. Cambios en `ENGINE_VERSION` invalidan todas las cachés de
//! los hosts aunque la configuración de formateo no cambie.

/// Versión lógica del formato canónico del fingerprint. Se incluye en el
/// input del hashing; incrementar sólo ante cambios incompatibles en la
/// codificación canónica de steps o políticas.
pub const ENGINE_VERSION: &str = "F1.0";

/// Nombre por defecto de un fence de tipo on/off.
pub const DEFAULT_FENCE_NAME: &str = "toggle";

/// Marcadores por defecto del fence `toggle`.
pub const DEFAULT_FENCE_OPEN: &str = "fmtflow:off";
pub const DEFAULT_FENCE_CLOSE: &str = "fmtflow:on";

/// Identidad de archivo usada en errores cuando el texto no proviene de disco.
pub const IN_MEMORY_FILE: &str = "<memory>";
