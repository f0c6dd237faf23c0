//! Normaliza la indentación inicial de cada línea a espacios o a tabs.
//!
//! Un tab cuenta como `num_spaces_per_tab` columnas. Las líneas que sólo
//! contienen blancos no se tocan; las continuaciones de comentario de bloque
//! (` * ...`) conservan el espacio previo al `*`.

use fmt_core::{ConfigurationError, FormatContext, StatefulStep, StepError};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentType {
    Space,
    Tab,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndentState {
    kind: IndentType,
    num_spaces_per_tab: usize,
}

#[derive(Debug, Clone)]
pub struct IndentStep {
    state: IndentState,
}

impl IndentStep {
    pub const DEFAULT_NUM_SPACES_PER_TAB: usize = 4;

    pub fn create(kind: IndentType) -> Self {
        Self { state: IndentState { kind,
                                    num_spaces_per_tab: Self::DEFAULT_NUM_SPACES_PER_TAB } }
    }

    pub fn with_spaces_per_tab(kind: IndentType, num_spaces_per_tab: usize) -> Result<Self, ConfigurationError> {
        if num_spaces_per_tab == 0 {
            return Err(ConfigurationError::InvalidValue { option: "num_spaces_per_tab".into(),
                                                          reason: "must be at least 1".into() });
        }
        Ok(Self { state: IndentState { kind, num_spaces_per_tab } })
    }

    fn reindent(&self, line: &str, out: &mut String) {
        let indent_len = line.len() - line.trim_start_matches([' ', '\t']).len();
        let (indent, rest) = line.split_at(indent_len);
        if rest.is_empty() {
            out.push_str(line);
            return;
        }
        let per_tab = self.state.num_spaces_per_tab;
        let mut width: usize = indent.chars().map(|c| if c == '\t' { per_tab } else { 1 }).sum();
        // ` * ` de comentarios de bloque: el espacio extra no es indentación
        let block_comment = rest.starts_with('*') && width % per_tab == 1;
        if block_comment {
            width -= 1;
        }
        match self.state.kind {
            IndentType::Space => out.extend(std::iter::repeat(' ').take(width)),
            IndentType::Tab => {
                out.extend(std::iter::repeat('\t').take(width / per_tab));
                out.extend(std::iter::repeat(' ').take(width % per_tab));
            }
        }
        if block_comment {
            out.push(' ');
        }
        out.push_str(rest);
    }
}

impl StatefulStep for IndentStep {
    type State = IndentState;

    fn name(&self) -> &str {
        match self.state.kind {
            IndentType::Space => "indentWithSpaces",
            IndentType::Tab => "indentWithTabs",
        }
    }

    fn state(&self) -> &IndentState {
        &self.state
    }

    fn apply_with(&self, unix: &str, _state: &IndentState, _ctx: &FormatContext<'_>) -> Result<String, StepError> {
        let mut out = String::with_capacity(unix.len());
        for (i, line) in unix.split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.reindent(line, &mut out);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmt_core::testing::{EqualityTester, StepHarness};
    use fmt_core::FormatterStep;

    #[test]
    fn tabs_to_spaces() {
        StepHarness::for_step(IndentStep::create(IndentType::Space))
            .test("\tfoo\n\t\tbar\n  baz", "    foo\n        bar\n  baz")
            .test_unaffected("\n   \t\n");
    }

    #[test]
    fn spaces_to_tabs_keeps_remainder() {
        StepHarness::for_step(IndentStep::with_spaces_per_tab(IndentType::Tab, 2).unwrap())
            .test("    a\n     b", "\t\ta\n\t\t b");
    }

    #[test]
    fn block_comment_continuation_keeps_its_space() {
        StepHarness::for_step(IndentStep::create(IndentType::Tab))
            .test("/**\n     * doc\n     */", "/**\n\t * doc\n\t */");
    }

    #[test]
    fn zero_spaces_per_tab_is_a_configuration_error() {
        let err = IndentStep::with_spaces_per_tab(IndentType::Space, 0).unwrap_err();
        assert!(err.to_string().contains("num_spaces_per_tab"));
    }

    #[test]
    fn equality() {
        EqualityTester::new(|cfg: &(IndentType, usize)| -> Box<dyn FormatterStep> {
            Box::new(IndentStep::with_spaces_per_tab(cfg.0, cfg.1).unwrap())
        }).are_different_than((IndentType::Space, 4))
          .are_different_than((IndentType::Space, 2))
          .are_different_than((IndentType::Tab, 4))
          .are_different_than((IndentType::Tab, 2))
          .test_equals();
    }
}
