use std::sync::Arc;

use fmt_core::testing::StepHarness;
use fmt_core::{FenceSpec, Formatter, FormatterStep};
use fmt_steps::{EndWithNewlineStep, IndentStep, IndentType, ReplaceRegexStep, TrimTrailingWhitespaceStep};

#[test]
fn whitespace_and_indent_chain() {
    let formatter = Formatter::builder().step(IndentStep::create(IndentType::Space))
                                        .step(TrimTrailingWhitespaceStep::create())
                                        .step(EndWithNewlineStep::create())
                                        .build();
    StepHarness::for_formatter(formatter).test("fn x() {\n\tlet a = 1;  \n}", "fn x() {\n    let a = 1;\n}\n");
}

#[test]
fn regex_only_inside_fenced_region() {
    let inner: Vec<Arc<dyn FormatterStep>> = vec![Arc::new(ReplaceRegexStep::create("tabs", "\t", "  ").unwrap())];
    let fence = FenceSpec::named("sql").open_close("-- sql:begin", "-- sql:end").unwrap().apply_within(inner);
    StepHarness::for_step(fence).test("a\tb\n-- sql:begin\n\tselect\n-- sql:end\n\tc",
                                      "a\tb\n-- sql:begin\n  select\n-- sql:end\n\tc");
}
