//! Builder para `Formatter`.
//!
//! Defaults: `LineEnding::Unix`, UTF-8, sin steps y sin raíz.

use std::path::PathBuf;
use std::sync::Arc;

use super::Formatter;
use crate::policy::{EncodingPolicy, LineEnding};
use crate::step::{FormatterStep, StepChain};

#[derive(Debug, Default)]
pub struct FormatterBuilder {
    steps: Vec<Arc<dyn FormatterStep>>,
    line_ending: LineEnding,
    encoding: EncodingPolicy,
    root: Option<PathBuf>,
}

impl FormatterBuilder {
    /// Añade un step al final de la cadena.
    pub fn step<S: FormatterStep + 'static>(mut self, step: S) -> Self {
        self.steps.push(Arc::new(step));
        self
    }

    /// Añade varios steps ya compartidos, en orden.
    pub fn steps(mut self, steps: impl IntoIterator<Item = Arc<dyn FormatterStep>>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn encoding(mut self, encoding: EncodingPolicy) -> Self {
        self.encoding = encoding;
        self
    }

    /// Raíz del proyecto; metadata para los steps, el engine no la usa.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn build(self) -> Formatter {
        Formatter::from_parts(StepChain::new(self.steps), self.line_ending, self.encoding, self.root)
    }
}
