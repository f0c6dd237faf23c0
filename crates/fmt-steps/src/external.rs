//! Steps que envuelven un formateador externo versionado.
//!
//! El formateador externo puede tener estado mutable interno y no ser
//! seguro entre hilos, así que cada hilo trabajador obtiene su propia
//! instancia (creada bajo demanda por la factory). La configuración
//! observable (herramienta, versión y opciones) es el estado del step y
//! por lo tanto su equality key.
//!
//! Algunas opciones sólo existen a partir de cierta versión de la
//! herramienta; `requires` declara esos mínimos y `build` los valida antes
//! de formatear nada.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use dashmap::DashMap;
use fmt_core::{ConfigurationError, FormatContext, StatefulStep, StepError};
use serde::Serialize;
use serde_json::Value;

use crate::version::Version;

/// Una instancia de la librería envuelta.
///
/// La salida sólo puede depender de `unix` y `options`; el estado interno
/// de la instancia es caché (tablas, parsers inicializados), nunca input.
pub trait ExternalFormatter: Send {
    fn format(&mut self, unix: &str, options: &BTreeMap<String, Value>) -> Result<String, StepError>;
}

pub type FormatterFactory = Arc<dyn Fn() -> Box<dyn ExternalFormatter> + Send + Sync>;

type Instance = Arc<Mutex<Box<dyn ExternalFormatter>>>;

#[derive(Debug, Clone, Serialize)]
pub struct ExternalState {
    tool: String,
    version: Version,
    options: BTreeMap<String, Value>,
}

/// Mínimo de versión para una opción (o para un valor concreto de ella).
#[derive(Debug, Clone)]
struct OptionGate {
    option: String,
    value: Option<Value>,
    min_version: String,
}

pub struct ExternalStepBuilder {
    tool: String,
    version: String,
    options: BTreeMap<String, Value>,
    gates: Vec<OptionGate>,
}

impl ExternalStepBuilder {
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// `value = None` exige la versión para cualquier valor de la opción.
    pub fn requires(mut self, option: impl Into<String>, value: Option<Value>, min_version: impl Into<String>) -> Self {
        self.gates.push(OptionGate { option: option.into(),
                                     value,
                                     min_version: min_version.into() });
        self
    }

    pub fn build<F>(self, factory: F) -> Result<ExternalStep, ConfigurationError>
        where F: Fn() -> Box<dyn ExternalFormatter> + Send + Sync + 'static
    {
        let version = Version::parse(&self.version)?;
        for gate in &self.gates {
            let Some(configured) = self.options.get(&gate.option) else {
                continue;
            };
            if gate.value.as_ref().is_some_and(|v| v != configured) {
                continue;
            }
            let required = Version::parse(&gate.min_version)?;
            if version < required {
                let option = match &gate.value {
                    Some(v) => format!("{}={}", gate.option, display_value(v)),
                    None => gate.option.clone(),
                };
                return Err(ConfigurationError::UnsupportedOption { option,
                                                                   required: required.to_string(),
                                                                   actual: version.to_string() });
            }
        }
        Ok(ExternalStep { state: ExternalState { tool: self.tool,
                                                 version,
                                                 options: self.options },
                          factory: Arc::new(factory),
                          instances: DashMap::new() })
    }
}

fn display_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub struct ExternalStep {
    state: ExternalState,
    factory: FormatterFactory,
    instances: DashMap<ThreadId, Instance>,
}

impl ExternalStep {
    pub fn builder(tool: impl Into<String>, version: impl Into<String>) -> ExternalStepBuilder {
        ExternalStepBuilder { tool: tool.into(),
                              version: version.into(),
                              options: BTreeMap::new(),
                              gates: Vec::new() }
    }

    pub fn version(&self) -> &Version {
        &self.state.version
    }

    /// Número de instancias creadas hasta ahora (una por hilo que formateó).
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    fn instance(&self) -> Instance {
        let id = thread::current().id();
        // se clona el Arc para soltar el guard del shard antes de formatear
        self.instances
            .entry(id)
            .or_insert_with(|| {
                log::debug!("creating {} {} instance for {:?}", self.state.tool, self.state.version, id);
                Arc::new(Mutex::new((self.factory)()))
            })
            .clone()
    }
}

impl fmt::Debug for ExternalStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalStep")
         .field("state", &self.state)
         .field("instances", &self.instances.len())
         .finish()
    }
}

impl StatefulStep for ExternalStep {
    type State = ExternalState;

    fn name(&self) -> &str {
        &self.state.tool
    }

    fn state(&self) -> &ExternalState {
        &self.state
    }

    fn apply_with(&self, unix: &str, state: &ExternalState, _ctx: &FormatContext<'_>) -> Result<String, StepError> {
        let instance = self.instance();
        let mut formatter = instance.lock()
                                    .map_err(|_| StepError::failed(format!("{} instance poisoned", state.tool)))?;
        formatter.format(unix, &state.options)
    }
}
