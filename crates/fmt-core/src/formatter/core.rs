//! Implementación del pipeline de formateo.

use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::{json, Value};

use super::FormatterBuilder;
use crate::equality::EqualityKey;
use crate::errors::FormatError;
use crate::policy::{EncodingPolicy, LineEnding};
use crate::step::{FormatContext, FormatterStep, StepChain};

/// Pipeline inmutable. `format_*` no guarda estado entre llamadas, por lo que
/// una misma instancia se comparte entre hilos sin sincronización.
pub struct Formatter {
    chain: StepChain,
    line_ending: LineEnding,
    encoding: EncodingPolicy,
    root: Option<PathBuf>,
}

impl Formatter {
    pub fn builder() -> FormatterBuilder {
        FormatterBuilder::default()
    }

    pub(crate) fn from_parts(chain: StepChain,
                             line_ending: LineEnding,
                             encoding: EncodingPolicy,
                             root: Option<PathBuf>)
                             -> Self {
        Self { chain,
               line_ending,
               encoding,
               root }
    }

    pub fn steps(&self) -> &[std::sync::Arc<dyn FormatterStep>] {
        self.chain.steps()
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn encoding(&self) -> EncodingPolicy {
        self.encoding
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Keys de los steps en orden; útiles para invalidación fina por step.
    pub fn equality_keys(&self) -> Vec<EqualityKey> {
        self.chain.equality_keys()
    }

    /// `false` si algún step es never-up-to-date.
    pub fn is_cacheable(&self) -> bool {
        self.equality_keys().iter().all(EqualityKey::is_cacheable)
    }

    /// Forma canónica de la configuración (steps en orden + políticas) que
    /// consume el fingerprint.
    pub fn canonical_value(&self) -> Value {
        let steps: Vec<Value> = self.equality_keys().iter().map(EqualityKey::to_value).collect();
        json!({
            "steps": steps,
            "line_ending": self.line_ending.identity(),
            "encoding": self.encoding.name(),
        })
    }

    /// Formatea texto ya decodificado: normaliza a `\n`, aplica los steps y
    /// convierte al final de línea de la política.
    pub fn format_text(&self, text: &str, file: Option<&Path>) -> Result<String, FormatError> {
        let ctx = FormatContext::new(file, self.root());
        let unix = LineEnding::to_unix(text);
        let formatted = self.chain
                            .apply(&unix, &ctx)
                            .map_err(|f| FormatError::StepFailed { step: f.step,
                                                                   file: ctx.display_file(),
                                                                   source: f.error })?;
        Ok(self.line_ending.apply(&formatted, text).into_owned())
    }

    /// Bytes crudos → decodificación → `format_text` → codificación.
    pub fn format_bytes(&self, raw: &[u8], file: Option<&Path>) -> Result<Vec<u8>, FormatError> {
        let ctx = FormatContext::new(file, self.root());
        let text = self.encoding
                       .decode(raw)
                       .ok_or_else(|| FormatError::Decode { encoding: self.encoding.name().to_string(),
                                                            file: ctx.display_file() })?;
        let formatted = self.format_text(&text, file)?;
        let bytes = self.encoding
                        .encode(&formatted)
                        .ok_or_else(|| FormatError::Encode { encoding: self.encoding.name().to_string(),
                                                             file: ctx.display_file() })?;
        debug!("formatted {} ({} -> {} bytes)", ctx.display_file(), raw.len(), bytes.len());
        Ok(bytes.into_owned())
    }

    /// `true` si formatear `raw` no cambia ningún byte.
    pub fn is_clean(&self, raw: &[u8], file: Option<&Path>) -> Result<bool, FormatError> {
        Ok(self.format_bytes(raw, file)? == raw)
    }
}

/// Igualdad de configuración: mismas keys en el mismo orden y mismas
/// políticas. Un step never-up-to-date hace que ni siquiera un formatter sea
/// igual a sí mismo.
impl PartialEq for Formatter {
    fn eq(&self, other: &Self) -> bool {
        self.line_ending.identity() == other.line_ending.identity()
        && self.encoding == other.encoding
        && self.equality_keys() == other.equality_keys()
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
         .field("steps", &self.chain)
         .field("line_ending", &self.line_ending)
         .field("encoding", &self.encoding)
         .field("root", &self.root)
         .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StepError;
    use crate::step::{FunctionStep, NeverUpToDateStep};

    fn append(suffix: &'static str) -> FunctionStep<&'static str> {
        FunctionStep::create(format!("append_{suffix}"), suffix, |s: &str, suffix: &&'static str| Ok(format!("{s}{suffix}")))
    }

    #[test]
    fn steps_run_in_declared_order() {
        let f = Formatter::builder().step(append("a")).step(append("b")).build();
        assert_eq!(f.format_text("x", None).unwrap(), "xab");
        let g = Formatter::builder().step(append("b")).step(append("a")).build();
        assert_eq!(g.format_text("x", None).unwrap(), "xba");
        assert_ne!(f, g);
    }

    #[test]
    fn line_ending_policy_applies_after_steps() {
        let f = Formatter::builder().line_ending(LineEnding::Windows).build();
        assert_eq!(f.format_text("a\nb\r\nc\rd", None).unwrap(), "a\r\nb\r\nc\r\nd");
    }

    #[test]
    fn steps_only_see_unix_line_endings() {
        let probe = FunctionStep::create("no_cr", (), |s: &str, _: &()| {
            if s.contains('\r') {
                Err(StepError::failed("saw \\r"))
            } else {
                Ok(s.to_string())
            }
        });
        let f = Formatter::builder().step(probe).line_ending(LineEnding::Preserve).build();
        assert_eq!(f.format_text("a\r\nb\r\n", None).unwrap(), "a\r\nb\r\n");
    }

    #[test]
    fn failure_reports_step_and_file() {
        let failing = FunctionStep::create("boom", (), |_: &str, _: &()| Err(StepError::failed("parse error at 3:1")));
        let f = Formatter::builder().step(failing).step(append("a")).build();
        let err = f.format_text("x", Some(Path::new("src/Main.java"))).unwrap_err();
        assert_eq!(err,
                   FormatError::StepFailed { step: "boom".into(),
                                             file: "src/Main.java".into(),
                                             source: StepError::failed("parse error at 3:1") });
        assert_eq!(err.step(), Some("boom"));
    }

    #[test]
    fn format_bytes_round_trips_encoding() {
        let latin = EncodingPolicy::for_label("latin1").unwrap();
        let f = Formatter::builder().encoding(latin).step(append("!")).build();
        assert_eq!(f.format_bytes(&[0x63, 0x61, 0x66, 0xe9], None).unwrap(), vec![0x63, 0x61, 0x66, 0xe9, b'!']);
    }

    #[test]
    fn malformed_input_is_a_decode_error() {
        let f = Formatter::builder().build();
        assert!(matches!(f.format_bytes(&[0xff, 0xfe, 0x00], None), Err(FormatError::Decode { .. })));
    }

    #[test]
    fn is_clean_detects_pending_changes() {
        let f = Formatter::builder().line_ending(LineEnding::Unix).build();
        assert!(f.is_clean(b"a\nb\n", None).unwrap());
        assert!(!f.is_clean(b"a\r\nb\r\n", None).unwrap());
    }

    #[test]
    fn equality_covers_policies() {
        let unix = Formatter::builder().step(append("a")).build();
        let unix2 = Formatter::builder().step(append("a")).build();
        let windows = Formatter::builder().step(append("a")).line_ending(LineEnding::Windows).build();
        let latin = Formatter::builder().step(append("a")).encoding(EncodingPolicy::for_label("latin1").unwrap()).build();
        assert_eq!(unix, unix2);
        assert_ne!(unix, windows);
        assert_ne!(unix, latin);
    }

    #[test]
    fn never_up_to_date_formatter_is_not_cacheable() {
        let f = Formatter::builder().step(NeverUpToDateStep::identity("id")).build();
        assert!(!f.is_cacheable());
        assert!(!f.eq(&f));
    }
}
