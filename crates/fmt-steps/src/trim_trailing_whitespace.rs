//! Elimina espacios y tabs al final de cada línea.

use fmt_core::{FormatContext, StatefulStep, StepError};

#[derive(Debug, Clone, Copy, Default)]
pub struct TrimTrailingWhitespaceStep;

impl TrimTrailingWhitespaceStep {
    pub fn create() -> Self {
        Self
    }
}

impl StatefulStep for TrimTrailingWhitespaceStep {
    type State = ();

    fn name(&self) -> &str {
        "trimTrailingWhitespace"
    }

    fn state(&self) -> &() {
        &()
    }

    fn apply_with(&self, unix: &str, _state: &(), _ctx: &FormatContext<'_>) -> Result<String, StepError> {
        let mut out = String::with_capacity(unix.len());
        for (i, line) in unix.split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(line.trim_end_matches([' ', '\t']));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmt_core::testing::StepHarness;

    #[test]
    fn trims_each_line() {
        StepHarness::for_step(TrimTrailingWhitespaceStep::create())
            .test("a  \nb\t\n  c \t", "a\nb\n  c")
            .test_unaffected("")
            .test_unaffected("\n\n");
    }
}
