//! Utilidades de test para autores de steps.
//!
//! - `StepHarness`: formatea con uno o varios steps y verifica salida,
//!   idempotencia y errores.
//! - `EqualityTester`: verifica que una serie de configuraciones produce
//!   keys distintas entre sí y estables al reconstruirse.
//!
//! Las funciones hacen `panic!` con mensajes descriptivos; están pensadas
//! para usarse dentro de `#[test]`.

use std::sync::Arc;

use crate::equality::EqualityKey;
use crate::errors::FormatError;
use crate::formatter::Formatter;
use crate::step::FormatterStep;

pub struct StepHarness {
    formatter: Formatter,
}

impl StepHarness {
    pub fn for_step<S: FormatterStep + 'static>(step: S) -> Self {
        Self { formatter: Formatter::builder().step(step).build() }
    }

    pub fn for_steps(steps: Vec<Arc<dyn FormatterStep>>) -> Self {
        Self { formatter: Formatter::builder().steps(steps).build() }
    }

    pub fn for_formatter(formatter: Formatter) -> Self {
        Self { formatter }
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// `before` se formatea a `after`, y `after` ya está limpio.
    pub fn test(&self, before: &str, after: &str) -> &Self {
        let actual = self.format(before);
        assert_eq!(actual, after, "unexpected output for input {before:?}");
        self.test_unaffected(after)
    }

    /// `clean` no cambia al formatearlo.
    pub fn test_unaffected(&self, clean: &str) -> &Self {
        let again = self.format(clean);
        assert_eq!(again, clean, "formatting is not idempotent for {clean:?}");
        self
    }

    /// Formatear `before` falla y el mensaje contiene `fragment`.
    pub fn test_error(&self, before: &str, fragment: &str) -> FormatError {
        match self.formatter.format_text(before, None) {
            Ok(out) => panic!("expected an error for {before:?}, got {out:?}"),
            Err(e) => {
                assert!(e.to_string().contains(fragment), "error '{e}' does not mention '{fragment}'");
                e
            }
        }
    }

    fn format(&self, input: &str) -> String {
        match self.formatter.format_text(input, None) {
            Ok(out) => out,
            Err(e) => panic!("formatting {input:?} failed: {e}"),
        }
    }
}

/// Verifica la ley de igualdad de una familia de steps.
///
/// `create` construye un step desde una configuración. Para cada
/// configuración se construye dos veces (deben ser iguales) y se compara
/// contra todas las demás (deben ser distintas).
pub struct EqualityTester<C, F> {
    configs: Vec<C>,
    create: F,
}

impl<C, F> EqualityTester<C, F>
    where C: std::fmt::Debug,
          F: Fn(&C) -> Box<dyn FormatterStep>
{
    pub fn new(create: F) -> Self {
        Self { configs: Vec::new(),
               create }
    }

    /// Añade una configuración que debe ser distinta de todas las anteriores.
    pub fn are_different_than(mut self, config: C) -> Self {
        self.configs.push(config);
        self
    }

    pub fn test_equals(&self) {
        let keys: Vec<EqualityKey> = self.configs.iter().map(|c| (self.create)(c).equality_key()).collect();
        for (config, key) in self.configs.iter().zip(&keys) {
            let again = (self.create)(config).equality_key();
            assert_eq!(key, &again, "rebuilding {config:?} changed its equality key");
        }
        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                assert_ne!(keys[i],
                           keys[j],
                           "{:?} and {:?} have the same equality key",
                           self.configs[i],
                           self.configs[j]);
            }
        }
    }
}
