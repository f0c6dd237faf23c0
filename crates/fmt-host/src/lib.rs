//! fmt-host: colaboradores del lado del host, fuera del core.
//!
//! - `config`: configuración desde entorno (`.env` incluido).
//! - `plugin`: resolución de la versión de la herramienta desde el modelo de build.
//! - `index`: índice side-car con el fingerprint y digests por archivo.
//! - `batch`: formateo de muchos archivos en un pool rayon.

pub mod batch;
pub mod config;
pub mod error;
pub mod index;
pub mod plugin;

pub use batch::{BatchReport, BatchRunner, FileOutcome, Mode};
pub use config::HostConfig;
pub use error::HostError;
pub use index::FileIndex;
pub use plugin::{BuildModel, PluginDescriptor};
