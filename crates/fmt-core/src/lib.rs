//! fmt-core: pipeline de formateo determinista + fingerprint de configuración.
//!
//! El core no implementa reglas de formateo: aplica una cadena ordenada de
//! steps opacos (`text -> text`), protege regiones con fences, normaliza
//! finales de línea y codificación, y produce las keys/fingerprints que el
//! host usa como clave de caché incremental.

pub mod constants;
pub mod equality;
pub mod errors;
pub mod fence;
pub mod fingerprint;
pub mod formatter;
pub mod hashing;
pub mod policy;
pub mod step;
pub mod testing;

pub use equality::EqualityKey;
pub use errors::{ConfigurationError, FingerprintError, FormatError, StepError};
pub use fence::{FenceMode, FenceRegion, FenceSpec, FenceStep, MarkerPolicy};
pub use fingerprint::Fingerprint;
pub use formatter::{Formatter, FormatterBuilder};
pub use policy::{EncodingPolicy, LineEnding};
pub use step::{FormatContext, FormatterStep, FunctionStep, NeverUpToDateStep, StatefulStep, StepChain, StepFailure};
