//! fmtflow: motor de formateo incremental.
//!
//! Fachada sobre los crates del workspace:
//! - `core` (`fmt-core`): pipeline de steps, fences, políticas y fingerprint.
//! - `steps` (`fmt-steps`): steps genéricos listos para usar.
//! - `host` (`fmt-host`): configuración, índice incremental y ejecución por lotes.
//!
//! `cli` contiene la lógica del binario `fmtflow`.

pub mod cli;

pub use fmt_core as core;
pub use fmt_host as host;
pub use fmt_steps as steps;

pub use fmt_core::{Fingerprint, Formatter, FormatterStep, LineEnding};
