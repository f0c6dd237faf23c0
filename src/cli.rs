//! CLI mínima: `fmtflow [check|apply] [--no-index] <archivo>...`

use std::path::PathBuf;
use std::sync::Arc;

use fmt_core::{FenceSpec, Formatter, FormatterStep};
use fmt_host::{BatchReport, BatchRunner, FileIndex, HostConfig, HostError, Mode};
use fmt_steps::{EndWithNewlineStep, TrimTrailingWhitespaceStep};
use thiserror::Error;

pub const USAGE: &str = "usage: fmtflow [check|apply] [--no-index] <file>...";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}\n{USAGE}")]
    Usage(String),
    #[error(transparent)]
    Host(#[from] HostError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub mode: Mode,
    pub files: Vec<PathBuf>,
    pub use_index: bool,
}

/// `args` sin el nombre del programa.
pub fn parse_args(args: &[String]) -> Result<Invocation, CliError> {
    let (mode, rest) = match args.split_first() {
        Some((cmd, rest)) if cmd == "check" => (Mode::Check, rest),
        Some((cmd, rest)) if cmd == "apply" => (Mode::Apply, rest),
        Some((cmd, _)) => return Err(CliError::Usage(format!("unknown command '{cmd}'"))),
        None => return Err(CliError::Usage("missing command".into())),
    };
    let mut use_index = true;
    let mut files = Vec::new();
    for arg in rest {
        match arg.as_str() {
            "--no-index" => use_index = false,
            flag if flag.starts_with("--") => return Err(CliError::Usage(format!("unknown flag '{flag}'"))),
            file => files.push(PathBuf::from(file)),
        }
    }
    if files.is_empty() {
        return Err(CliError::Usage("no files given".into()));
    }
    Ok(Invocation { mode, files, use_index })
}

/// Formatter por defecto: quita blancos finales y asegura el salto de línea
/// final, respetando las regiones `fmtflow:off` / `fmtflow:on`.
pub fn default_formatter(cfg: &HostConfig) -> Formatter {
    let steps: Vec<Arc<dyn FormatterStep>> =
        vec![Arc::new(TrimTrailingWhitespaceStep::create()), Arc::new(EndWithNewlineStep::create())];
    Formatter::builder().step(FenceSpec::toggle().preserve_within(steps))
                        .line_ending(cfg.line_ending)
                        .encoding(cfg.encoding)
                        .build()
}

pub fn run(inv: &Invocation, cfg: &HostConfig) -> Result<BatchReport, CliError> {
    let formatters = [default_formatter(cfg)];
    let runner = BatchRunner::new(&formatters[0], inv.mode).with_threads(cfg.threads);
    if !inv.use_index {
        return Ok(runner.run(&inv.files, None)?);
    }
    let mut index = FileIndex::load(&cfg.index_file, &cfg.tool_version, &formatters)?;
    let report = runner.run(&inv.files, Some(&mut index))?;
    index.save(&cfg.index_file)?;
    Ok(report)
}
