use std::fmt;
use std::sync::Arc;

use log::debug;

use super::{FormatContext, FormatterStep};
use crate::equality::EqualityKey;
use crate::errors::StepError;
use crate::policy::LineEnding;

/// Fallo de un step dentro de una cadena: nombre del step + causa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub step: String,
    pub error: StepError,
}

/// Secuencia ordenada e inmutable de steps. La salida del step *i* es la
/// única entrada del step *i+1*; ante el primer error la cadena se detiene.
#[derive(Clone, Default)]
pub struct StepChain {
    steps: Vec<Arc<dyn FormatterStep>>,
}

impl StepChain {
    pub fn new(steps: Vec<Arc<dyn FormatterStep>>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Arc<dyn FormatterStep>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Keys en el orden de la cadena.
    pub fn equality_keys(&self) -> Vec<EqualityKey> {
        self.steps.iter().map(|s| s.equality_key()).collect()
    }

    /// Aplica los steps en orden. Cada salida se normaliza a `\n` antes de
    /// pasarla al siguiente step.
    pub fn apply(&self, unix: &str, ctx: &FormatContext<'_>) -> Result<String, StepFailure> {
        let mut current = unix.to_string();
        for step in &self.steps {
            let formatted = step.apply(&current, ctx)
                                .map_err(|error| StepFailure { step: step.name().to_string(),
                                                               error })?;
            if formatted != current {
                debug!("step '{}' changed {}", step.name(), ctx.display_file());
                current = LineEnding::to_unix(&formatted).into_owned();
            }
        }
        Ok(current)
    }
}

impl fmt::Debug for StepChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.steps.iter().map(|s| s.name())).finish()
    }
}

impl FromIterator<Arc<dyn FormatterStep>> for StepChain {
    fn from_iter<I: IntoIterator<Item = Arc<dyn FormatterStep>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
