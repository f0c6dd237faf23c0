//! Definiciones relacionadas a Steps.
//!
//! Un Step es una transformación de texto atómica, con nombre y
//! determinista. Este módulo define:
//! - `FormatterStep`: interfaz neutral usada por el engine.
//! - `StatefulStep`: interfaz de alto nivel con estado serializable tipado;
//!   un adaptador la convierte en `FormatterStep` con su `EqualityKey`.
//! - `FunctionStep` / `NeverUpToDateStep`: steps construidos desde closures.
//! - `StepChain`: secuencia ordenada de steps.

pub mod chain;
pub mod definition;
pub mod function;
pub mod stateful;

pub use chain::{StepChain, StepFailure};
pub use definition::{FormatContext, FormatterStep};
pub use function::{FunctionStep, NeverUpToDateStep};
pub use stateful::StatefulStep;
