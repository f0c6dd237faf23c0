//! Reemplazos literales y por expresión regular.

use fmt_core::{ConfigurationError, FormatContext, StatefulStep, StepError};
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ReplaceState {
    target: String,
    replacement: String,
}

/// Reemplaza todas las apariciones literales de `target`.
#[derive(Debug, Clone)]
pub struct ReplaceStep {
    name: String,
    state: ReplaceState,
}

impl ReplaceStep {
    pub fn create(name: impl Into<String>,
                  target: impl Into<String>,
                  replacement: impl Into<String>)
                  -> Result<Self, ConfigurationError> {
        let target = target.into();
        if target.is_empty() {
            return Err(ConfigurationError::InvalidValue { option: "target".into(),
                                                          reason: "must not be empty".into() });
        }
        Ok(Self { name: name.into(),
                  state: ReplaceState { target,
                                        replacement: replacement.into() } })
    }
}

impl StatefulStep for ReplaceStep {
    type State = ReplaceState;

    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> &ReplaceState {
        &self.state
    }

    fn apply_with(&self, unix: &str, state: &ReplaceState, _ctx: &FormatContext<'_>) -> Result<String, StepError> {
        Ok(unix.replace(&state.target, &state.replacement))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplaceRegexState {
    pattern: String,
    replacement: String,
}

/// Reemplaza las coincidencias de una regex; `replacement` admite `$1`,
/// `${name}`, etc. La regex compilada queda fuera del estado: el patrón
/// fuente la describe por completo.
#[derive(Debug, Clone)]
pub struct ReplaceRegexStep {
    name: String,
    state: ReplaceRegexState,
    regex: Regex,
}

impl ReplaceRegexStep {
    pub fn create(name: impl Into<String>,
                  pattern: &str,
                  replacement: impl Into<String>)
                  -> Result<Self, ConfigurationError> {
        let regex = Regex::new(pattern).map_err(|e| ConfigurationError::InvalidPattern { pattern: pattern.to_string(),
                                                                                         reason: e.to_string() })?;
        Ok(Self { name: name.into(),
                  state: ReplaceRegexState { pattern: pattern.to_string(),
                                             replacement: replacement.into() },
                  regex })
    }
}

impl StatefulStep for ReplaceRegexStep {
    type State = ReplaceRegexState;

    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> &ReplaceRegexState {
        &self.state
    }

    fn apply_with(&self, unix: &str, state: &ReplaceRegexState, _ctx: &FormatContext<'_>) -> Result<String, StepError> {
        Ok(self.regex.replace_all(unix, state.replacement.as_str()).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmt_core::testing::{EqualityTester, StepHarness};
    use fmt_core::FormatterStep;

    #[test]
    fn literal_replace() {
        StepHarness::for_step(ReplaceStep::create("crlfComment", "/* TODO */", "// TODO").unwrap())
            .test("a /* TODO */ b /* TODO */", "a // TODO b // TODO");
    }

    #[test]
    fn regex_replace_with_groups() {
        StepHarness::for_step(ReplaceRegexStep::create("spaceAssign", r"(\w+)\s*=\s*(\w+)", "$1 = $2").unwrap())
            .test("a=b c  =d", "a = b c = d")
            .test_unaffected("x = y");
    }

    #[test]
    fn invalid_configuration_fails_fast() {
        assert!(matches!(ReplaceStep::create("r", "", "x"), Err(ConfigurationError::InvalidValue { .. })));
        assert!(matches!(ReplaceRegexStep::create("r", "(", "x"), Err(ConfigurationError::InvalidPattern { .. })));
    }

    #[test]
    fn equality() {
        EqualityTester::new(|cfg: &(&'static str, &'static str, &'static str)| -> Box<dyn FormatterStep> {
            Box::new(ReplaceRegexStep::create(cfg.0, cfg.1, cfg.2).unwrap())
        }).are_different_than(("r", "a", "b"))
          .are_different_than(("r", "a", "c"))
          .are_different_than(("r", "x", "b"))
          .are_different_than(("other", "a", "b"))
          .test_equals();
    }
}
