//! Fence regions: zonas del texto delimitadas por un marcador de apertura y
//! uno de cierre que se excluyen del formateo (o a las que se limita).
//!
//! Reglas de escaneo:
//! - Tras una apertura, el primer cierre termina la región. Aperturas dentro
//!   de una región abierta son texto literal (no hay anidamiento).
//! - Un cierre fuera de una región es texto literal.
//! - Una apertura sin cierre extiende la región hasta el final del texto.
//!
//! `PreserveWithin`: la cadena envuelta recibe el texto con el contenido de
//! cada región retirado (los marcadores quedan como anclas). Sobre la salida
//! se vuelven a localizar las regiones y se re-inserta el contenido original;
//! si la cadena añadió o eliminó marcadores el step falla.
//!
//! `ApplyWithin`: la cadena sólo ve el contenido de cada región, por
//! separado; el resto del texto queda intacto.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use log::debug;
use regex::Regex;
use serde::Serialize;

use crate::constants::{DEFAULT_FENCE_CLOSE, DEFAULT_FENCE_NAME, DEFAULT_FENCE_OPEN};
use crate::equality::EqualityKey;
use crate::errors::{ConfigurationError, StepError};
use crate::step::{FormatContext, FormatterStep, StepChain, StepFailure};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FenceMode {
    PreserveWithin,
    ApplyWithin,
}

/// Qué se restaura literalmente en `PreserveWithin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MarkerPolicy {
    /// Sólo el contenido entre marcadores; los marcadores son parte del
    /// texto formateado.
    #[default]
    Exclude,
    /// Marcadores y contenido se restauran tal como estaban en la entrada.
    Include,
}

#[derive(Debug, Clone)]
enum Marker {
    Literal(String),
    Pattern(Regex),
}

// Textos sobre los que se comprueba que un marcador regex nunca casa vacío.
const ZERO_WIDTH_SAMPLES: [&str; 4] = ["", "ab cd", "a\nb\n", " \t-_.:;/*#<>1"];

impl Marker {
    fn literal(text: &str) -> Result<Self, ConfigurationError> {
        if text.is_empty() {
            return Err(ConfigurationError::InvalidPattern { pattern: String::new(),
                                                            reason: "fence marker cannot be empty".into() });
        }
        Ok(Self::Literal(text.to_string()))
    }

    fn pattern(pattern: &str) -> Result<Self, ConfigurationError> {
        let re = Regex::new(pattern).map_err(|e| ConfigurationError::InvalidPattern { pattern: pattern.to_string(),
                                                                                      reason: e.to_string() })?;
        // un marcador de ancho cero (`\b`, `^`, `$`...) no delimita nada
        let zero_width = ZERO_WIDTH_SAMPLES.iter()
                                           .any(|sample| re.find_iter(sample).any(|m| m.is_empty()));
        if zero_width {
            return Err(ConfigurationError::InvalidPattern { pattern: pattern.to_string(),
                                                            reason: "fence marker must not match the empty string".into() });
        }
        Ok(Self::Pattern(re))
    }

    fn find_at(&self, text: &str, from: usize) -> Option<Range<usize>> {
        match self {
            Self::Literal(lit) => text[from..].find(lit.as_str()).map(|i| (from + i)..(from + i + lit.len())),
            Self::Pattern(re) => re.find_at(text, from).map(|m| m.range()),
        }
    }

    fn source(&self) -> &str {
        match self {
            Self::Literal(lit) => lit,
            Self::Pattern(re) => re.as_str(),
        }
    }

    fn is_regex(&self) -> bool {
        matches!(self, Self::Pattern(_))
    }
}

/// Una región localizada: rango del marcador de apertura y, si existe, del
/// de cierre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceRegion {
    pub open: Range<usize>,
    pub close: Option<Range<usize>>,
}

impl FenceRegion {
    /// Texto estrictamente entre marcadores.
    pub fn content(&self, text_len: usize) -> Range<usize> {
        self.open.end..self.close.as_ref().map_or(text_len, |c| c.start)
    }

    /// Región completa, marcadores incluidos.
    pub fn full(&self, text_len: usize) -> Range<usize> {
        self.open.start..self.close.as_ref().map_or(text_len, |c| c.end)
    }

    pub fn is_terminated(&self) -> bool {
        self.close.is_some()
    }
}

/// Definición de un par de marcadores con nombre, antes de asociarle steps.
///
/// ```ignore
/// let fence = FenceSpec::named("toggle").open_close("fmt:off", "fmt:on")?;
/// let step = fence.preserve_within(steps);
/// ```
#[derive(Debug, Clone)]
pub struct FenceSpec {
    name: String,
    open: Marker,
    close: Marker,
    policy: MarkerPolicy,
}

/// Primer paso del builder: sólo conoce el nombre.
#[derive(Debug, Clone)]
pub struct FenceName(String);

impl FenceSpec {
    pub fn named(name: impl Into<String>) -> FenceName {
        FenceName(name.into())
    }

    /// Fence `toggle` con los marcadores `fmtflow:off` / `fmtflow:on`.
    pub fn toggle() -> Self {
        Self { name: DEFAULT_FENCE_NAME.to_string(),
               open: Marker::Literal(DEFAULT_FENCE_OPEN.to_string()),
               close: Marker::Literal(DEFAULT_FENCE_CLOSE.to_string()),
               policy: MarkerPolicy::default() }
    }

    pub fn with_marker_policy(mut self, policy: MarkerPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn marker_policy(&self) -> MarkerPolicy {
        self.policy
    }

    /// Localiza todas las regiones de `text` (disjuntas, en orden).
    pub fn scan(&self, text: &str) -> Vec<FenceRegion> {
        let mut regions = Vec::new();
        let mut pos = 0;
        while let Some(open) = self.open.find_at(text, pos) {
            match self.close.find_at(text, open.end) {
                Some(close) => {
                    // avanza siempre al menos un carácter, aunque los marcadores sean vacíos
                    let next = text[open.start..].chars().next().map_or(text.len() + 1, |c| open.start + c.len_utf8());
                    pos = close.end.max(next);
                    regions.push(FenceRegion { open, close: Some(close) });
                    if pos > text.len() {
                        break;
                    }
                }
                None => {
                    regions.push(FenceRegion { open, close: None });
                    break;
                }
            }
        }
        regions
    }

    /// Los steps se aplican fuera de las regiones; su contenido se conserva.
    pub fn preserve_within(self, steps: Vec<Arc<dyn FormatterStep>>) -> FenceStep {
        FenceStep::new(self, FenceMode::PreserveWithin, StepChain::new(steps))
    }

    /// Los steps se aplican sólo dentro de las regiones.
    pub fn apply_within(self, steps: Vec<Arc<dyn FormatterStep>>) -> FenceStep {
        FenceStep::new(self, FenceMode::ApplyWithin, StepChain::new(steps))
    }
}

impl FenceName {
    pub fn open_close(self, open: &str, close: &str) -> Result<FenceSpec, ConfigurationError> {
        Ok(FenceSpec { name: self.0,
                       open: Marker::literal(open)?,
                       close: Marker::literal(close)?,
                       policy: MarkerPolicy::default() })
    }

    pub fn regex(self, open: &str, close: &str) -> Result<FenceSpec, ConfigurationError> {
        Ok(FenceSpec { name: self.0,
                       open: Marker::pattern(open)?,
                       close: Marker::pattern(close)?,
                       policy: MarkerPolicy::default() })
    }
}

#[derive(Serialize)]
struct FenceState<'a> {
    mode: FenceMode,
    policy: MarkerPolicy,
    open: &'a str,
    close: &'a str,
    regex: bool,
    steps: Vec<serde_json::Value>,
}

/// Step que envuelve una sub-cadena de steps con un fence.
pub struct FenceStep {
    spec: FenceSpec,
    mode: FenceMode,
    chain: StepChain,
    key: EqualityKey,
}

impl FenceStep {
    fn new(spec: FenceSpec, mode: FenceMode, chain: StepChain) -> Self {
        let key = Self::compute_key(&spec, mode, &chain);
        Self { spec, mode, chain, key }
    }

    // La key se fija al construir: la cadena es inmutable y así un step
    // interno never-up-to-date conserva el mismo nonce en cada consulta.
    fn compute_key(spec: &FenceSpec, mode: FenceMode, chain: &StepChain) -> EqualityKey {
        let keys = chain.equality_keys();
        if keys.iter().any(|k| !k.is_cacheable()) {
            return EqualityKey::never_up_to_date();
        }
        let state = FenceState { mode,
                                 policy: spec.policy,
                                 open: spec.open.source(),
                                 close: spec.close.source(),
                                 regex: spec.open.is_regex() || spec.close.is_regex(),
                                 steps: keys.iter().map(EqualityKey::to_value).collect() };
        EqualityKey::from_state(&spec.name, &state)
    }

    pub fn spec(&self) -> &FenceSpec {
        &self.spec
    }

    pub fn mode(&self) -> FenceMode {
        self.mode
    }

    pub fn chain(&self) -> &StepChain {
        &self.chain
    }

    fn nested(failure: StepFailure) -> StepError {
        StepError::Inner { step: failure.step,
                           source: Box::new(failure.error) }
    }

    fn preserve(&self, unix: &str, ctx: &FormatContext<'_>) -> Result<String, StepError> {
        let regions = self.spec.scan(unix);
        if regions.is_empty() {
            return self.chain.apply(unix, ctx).map_err(Self::nested);
        }

        let mut withheld = Vec::with_capacity(regions.len());
        let mut stripped = String::with_capacity(unix.len());
        let mut cursor = 0;
        for region in &regions {
            let content = region.content(unix.len());
            stripped.push_str(&unix[cursor..content.start]);
            cursor = content.end;
            let kept = match self.spec.policy {
                MarkerPolicy::Exclude => content,
                MarkerPolicy::Include => region.full(unix.len()),
            };
            withheld.push(&unix[kept]);
        }
        stripped.push_str(&unix[cursor..]);
        debug!("fence '{}' withheld {} region(s) of {}", self.spec.name, regions.len(), ctx.display_file());

        let formatted = self.chain.apply(&stripped, ctx).map_err(Self::nested)?;

        let found = self.spec.scan(&formatted);
        let same_shape = found.len() == regions.len()
                         && found.iter().zip(&regions).all(|(f, r)| f.is_terminated() == r.is_terminated());
        if !same_shape {
            return Err(StepError::FenceMismatch { fence: self.spec.name.clone(),
                                                  expected: regions.len(),
                                                  found: found.len() });
        }

        let mut out = String::with_capacity(formatted.len() + unix.len() - stripped.len());
        let mut cursor = 0;
        for (region, original) in found.iter().zip(withheld) {
            let target = match self.spec.policy {
                MarkerPolicy::Exclude => region.content(formatted.len()),
                MarkerPolicy::Include => region.full(formatted.len()),
            };
            out.push_str(&formatted[cursor..target.start]);
            out.push_str(original);
            cursor = target.end;
        }
        out.push_str(&formatted[cursor..]);
        Ok(out)
    }

    fn apply_inside(&self, unix: &str, ctx: &FormatContext<'_>) -> Result<String, StepError> {
        let mut out = String::with_capacity(unix.len());
        let mut cursor = 0;
        for region in self.spec.scan(unix) {
            let content = region.content(unix.len());
            out.push_str(&unix[cursor..content.start]);
            let formatted = self.chain.apply(&unix[content.clone()], ctx).map_err(Self::nested)?;
            out.push_str(&formatted);
            cursor = content.end;
        }
        out.push_str(&unix[cursor..]);
        Ok(out)
    }
}

impl fmt::Debug for FenceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FenceStep")
         .field("name", &self.spec.name)
         .field("mode", &self.mode)
         .field("policy", &self.spec.policy)
         .field("steps", &self.chain)
         .finish()
    }
}

impl FormatterStep for FenceStep {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn apply(&self, unix: &str, ctx: &FormatContext<'_>) -> Result<String, StepError> {
        match self.mode {
            FenceMode::PreserveWithin => self.preserve(unix, ctx),
            FenceMode::ApplyWithin => self.apply_inside(unix, ctx),
        }
    }

    fn equality_key(&self) -> EqualityKey {
        self.key.clone()
    }
}
