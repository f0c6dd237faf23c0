//! Steps construidos a partir de closures.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::{FormatContext, FormatterStep, StatefulStep};
use crate::equality::EqualityKey;
use crate::errors::StepError;

type StateFn<S> = dyn Fn(&str, &S) -> Result<String, StepError> + Send + Sync;
type PlainFn = dyn Fn(&str) -> Result<String, StepError> + Send + Sync;

/// Step definido por `(nombre, estado, función)`. La función sólo ve el
/// texto y el estado, por lo que la equality key del estado describe
/// completamente su comportamiento.
pub struct FunctionStep<S> {
    name: String,
    state: S,
    func: Arc<StateFn<S>>,
}

impl<S> FunctionStep<S> where S: Serialize + Send + Sync + fmt::Debug
{
    pub fn create<F>(name: impl Into<String>, state: S, func: F) -> Self
        where F: Fn(&str, &S) -> Result<String, StepError> + Send + Sync + 'static
    {
        Self { name: name.into(),
               state,
               func: Arc::new(func) }
    }
}

impl<S: fmt::Debug> fmt::Debug for FunctionStep<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionStep").field("name", &self.name).field("state", &self.state).finish()
    }
}

impl<S> StatefulStep for FunctionStep<S> where S: Serialize + Send + Sync + fmt::Debug
{
    type State = S;

    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> &S {
        &self.state
    }

    fn apply_with(&self, unix: &str, state: &S, _ctx: &FormatContext<'_>) -> Result<String, StepError> {
        (self.func)(unix, state)
    }
}

/// Step sin estado serializable: cada construcción obtiene una key nueva
/// que nunca compara igual, así que el host nunca lo considera cacheado.
pub struct NeverUpToDateStep {
    name: String,
    func: Arc<PlainFn>,
    key: EqualityKey,
}

impl NeverUpToDateStep {
    pub fn create<F>(name: impl Into<String>, func: F) -> Self
        where F: Fn(&str) -> Result<String, StepError> + Send + Sync + 'static
    {
        Self { name: name.into(),
               func: Arc::new(func),
               key: EqualityKey::never_up_to_date() }
    }

    /// Step identidad; útil en tests y como marcador de "siempre sucio".
    pub fn identity(name: impl Into<String>) -> Self {
        Self::create(name, |s| Ok(s.to_string()))
    }
}

impl fmt::Debug for NeverUpToDateStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeverUpToDateStep").field("name", &self.name).finish()
    }
}

impl FormatterStep for NeverUpToDateStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, unix: &str, _ctx: &FormatContext<'_>) -> Result<String, StepError> {
        (self.func)(unix)
    }

    fn equality_key(&self) -> EqualityKey {
        self.key.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_step_key_follows_state() {
        let upper = |s: &str, _: &u32| -> Result<String, StepError> { Ok(s.to_uppercase()) };
        let a = FunctionStep::create("upper", 1u32, upper);
        let b = FunctionStep::create("upper", 1u32, upper);
        let c = FunctionStep::create("upper", 2u32, upper);
        assert_eq!(a.equality_key(), b.equality_key());
        assert_ne!(a.equality_key(), c.equality_key());
        assert_eq!(a.apply("abc", &FormatContext::default()).unwrap(), "ABC");
    }

    #[test]
    fn never_up_to_date_differs_between_constructions() {
        let a = NeverUpToDateStep::identity("same");
        let b = NeverUpToDateStep::identity("same");
        assert_ne!(a.equality_key(), b.equality_key());
        assert_ne!(a.equality_key(), a.equality_key());
        assert_eq!(a.apply("x", &FormatContext::default()).unwrap(), "x");
    }
}
