//! fmt-steps: steps genéricos sobre el contrato de `fmt-core`.
//!
//! Este crate provee:
//! - Steps de texto sin dependencias externas: `TrimTrailingWhitespaceStep`,
//!   `EndWithNewlineStep`, `IndentStep`, `ReplaceStep`, `ReplaceRegexStep`.
//! - `ExternalStep`: envoltorio para formatters de terceros opacos, con
//!   opciones condicionadas a versión y una instancia por hilo.
//!
//! Todos implementan `StatefulStep`; su equality key se deriva del estado.

pub mod end_with_newline;
pub mod external;
pub mod indent;
pub mod replace;
pub mod trim_trailing_whitespace;
pub mod version;

pub use end_with_newline::EndWithNewlineStep;
pub use external::{ExternalFormatter, ExternalStep, ExternalStepBuilder};
pub use indent::{IndentStep, IndentType};
pub use replace::{ReplaceRegexStep, ReplaceStep};
pub use trim_trailing_whitespace::TrimTrailingWhitespaceStep;
pub use version::Version;
