//! Formateo de un lote de archivos en paralelo.
//!
//! El `Formatter` se comparte por referencia entre los hilos del pool. Cada
//! archivo es independiente: un fallo se registra en su `FileOutcome` y el
//! resto del lote continúa. El índice (si hay) sólo se consulta en paralelo;
//! se actualiza al final, en el hilo que llama.

use std::fs;
use std::path::{Path, PathBuf};

use fmt_core::Formatter;
use log::{error, info};
use rayon::prelude::*;

use crate::error::HostError;
use crate::index::FileIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Sólo informa qué archivos necesitan formato.
    Check,
    /// Reescribe los archivos que cambian.
    Apply,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Ya estaba formateado.
    Clean,
    /// Necesita formato (modo `Check`).
    Dirty,
    /// Se reescribió (modo `Apply`).
    Formatted,
    /// El índice dice que el contenido no cambió desde la última vez.
    Skipped,
    Failed(String),
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<(PathBuf, FileOutcome)>,
}

impl BatchReport {
    pub fn count(&self, wanted: impl Fn(&FileOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| wanted(o)).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.outcomes.iter().filter_map(|(p, o)| match o {
                                FileOutcome::Failed(msg) => Some((p.as_path(), msg.as_str())),
                                _ => None,
                            })
    }

    /// Sin fallos y, en modo check, sin archivos sucios.
    pub fn is_success(&self) -> bool {
        self.count(|o| matches!(o, FileOutcome::Failed(_) | FileOutcome::Dirty)) == 0
    }
}

pub struct BatchRunner<'a> {
    formatter: &'a Formatter,
    mode: Mode,
    threads: usize,
}

// Resultado interno: el contenido limpio se devuelve para registrarlo.
struct Processed {
    outcome: FileOutcome,
    clean_content: Option<Vec<u8>>,
}

impl<'a> BatchRunner<'a> {
    pub fn new(formatter: &'a Formatter, mode: Mode) -> Self {
        Self { formatter,
               mode,
               threads: 0 }
    }

    /// 0 = default de rayon.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn run(&self, files: &[PathBuf], mut index: Option<&mut FileIndex>) -> Result<BatchReport, HostError> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(self.threads)
                                                  .build()
                                                  .map_err(|e| HostError::Pool(e.to_string()))?;
        let snapshot = index.as_deref();
        let processed: Vec<Processed> = pool.install(|| files.par_iter().map(|f| self.process(f, snapshot)).collect());

        let mut report = BatchReport::default();
        for (file, p) in files.iter().zip(processed) {
            if let Some(index) = index.as_deref_mut() {
                match &p.clean_content {
                    Some(content) => index.record(file, content),
                    None => index.forget(file),
                }
            }
            report.outcomes.push((file.clone(), p.outcome));
        }
        info!("{:?}: {} file(s), {} clean, {} skipped, {} dirty, {} formatted, {} failed",
              self.mode,
              files.len(),
              report.count(|o| *o == FileOutcome::Clean),
              report.count(|o| *o == FileOutcome::Skipped),
              report.count(|o| *o == FileOutcome::Dirty),
              report.count(|o| *o == FileOutcome::Formatted),
              report.count(|o| matches!(o, FileOutcome::Failed(_))));
        Ok(report)
    }

    fn process(&self, file: &Path, index: Option<&FileIndex>) -> Processed {
        let raw = match fs::read(file) {
            Ok(raw) => raw,
            Err(e) => return failed(file, HostError::io(file, e).to_string()),
        };
        if index.is_some_and(|i| i.is_up_to_date(file, &raw)) {
            return Processed { outcome: FileOutcome::Skipped,
                               clean_content: Some(raw) };
        }
        let formatted = match self.formatter.format_bytes(&raw, Some(file)) {
            Ok(out) => out,
            Err(e) => return failed(file, e.to_string()),
        };
        if formatted == raw {
            return Processed { outcome: FileOutcome::Clean,
                               clean_content: Some(raw) };
        }
        match self.mode {
            Mode::Check => Processed { outcome: FileOutcome::Dirty,
                                       clean_content: None },
            Mode::Apply => match fs::write(file, &formatted) {
                Ok(()) => Processed { outcome: FileOutcome::Formatted,
                                      clean_content: Some(formatted) },
                Err(e) => failed(file, HostError::io(file, e).to_string()),
            },
        }
    }
}

fn failed(file: &Path, msg: String) -> Processed {
    error!("{}: {}", file.display(), msg);
    Processed { outcome: FileOutcome::Failed(msg),
                clean_content: None }
}
