//! Garantiza exactamente un `\n` al final del archivo.
//!
//! El espacio en blanco final (espacios, tabs, saltos) se reemplaza por un
//! único salto; un archivo vacío o sólo con blancos queda como `"\n"`.

use fmt_core::{FormatContext, StatefulStep, StepError};

#[derive(Debug, Clone, Copy, Default)]
pub struct EndWithNewlineStep;

impl EndWithNewlineStep {
    pub fn create() -> Self {
        Self
    }
}

impl StatefulStep for EndWithNewlineStep {
    type State = ();

    fn name(&self) -> &str {
        "endWithNewline"
    }

    fn state(&self) -> &() {
        &()
    }

    fn apply_with(&self, unix: &str, _state: &(), _ctx: &FormatContext<'_>) -> Result<String, StepError> {
        let content = unix.trim_end_matches(['\n', ' ', '\t']);
        let mut out = String::with_capacity(content.len() + 1);
        out.push_str(content);
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmt_core::testing::StepHarness;

    #[test]
    fn adds_or_collapses_final_newline() {
        StepHarness::for_step(EndWithNewlineStep::create())
            .test("a", "a\n")
            .test("a\n\n\n", "a\n")
            .test("a \t\n ", "a\n")
            .test("", "\n")
            .test_unaffected("line1\nline2\n");
    }
}
