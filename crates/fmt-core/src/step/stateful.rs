use std::fmt;

use serde::Serialize;

use super::{FormatContext, FormatterStep};
use crate::equality::EqualityKey;
use crate::errors::StepError;

/// Interfaz de alto nivel para steps cuyo estado de configuración es un
/// valor serializable.
///
/// Implementadores exponen `state` y escriben `apply_with`; el adaptador de
/// abajo deriva `FormatterStep` y calcula la `EqualityKey` desde el estado.
/// Todo lo que influya en la salida debe vivir en `State`.
pub trait StatefulStep: Send + Sync + fmt::Debug {
    type State: Serialize + Send + Sync;

    fn name(&self) -> &str;

    fn state(&self) -> &Self::State;

    fn apply_with(&self, unix: &str, state: &Self::State, ctx: &FormatContext<'_>) -> Result<String, StepError>;
}

// -------------------------------------------------------------
// Adaptador: cualquier `StatefulStep` implementa `FormatterStep` neutro.
// -------------------------------------------------------------
impl<T> FormatterStep for T where T: StatefulStep
{
    fn name(&self) -> &str {
        <Self as StatefulStep>::name(self)
    }

    fn apply(&self, unix: &str, ctx: &FormatContext<'_>) -> Result<String, StepError> {
        self.apply_with(unix, self.state(), ctx)
    }

    fn equality_key(&self) -> EqualityKey {
        EqualityKey::from_state(<Self as StatefulStep>::name(self), self.state())
    }
}
