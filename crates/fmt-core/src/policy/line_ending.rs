use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::ConfigurationError;

/// Política de finales de línea aplicada a la salida del `Formatter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LineEnding {
    /// `\n`
    #[default]
    Unix,
    /// `\r\n`
    Windows,
    /// `\r`
    MacClassic,
    /// El final nativo de la plataforma donde corre el proceso.
    PlatformNative,
    /// El primer final de línea encontrado en el archivo (`\n` si no hay).
    Preserve,
}

impl LineEnding {
    pub const ALL: [LineEnding; 5] =
        [Self::Unix, Self::Windows, Self::MacClassic, Self::PlatformNative, Self::Preserve];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unix => "unix",
            Self::Windows => "windows",
            Self::MacClassic => "mac_classic",
            Self::PlatformNative => "platform_native",
            Self::Preserve => "preserve",
        }
    }

    /// Terminador fijo de la política, `None` si depende del archivo.
    pub fn fixed_terminator(&self) -> Option<&'static str> {
        match self {
            Self::Unix => Some("\n"),
            Self::Windows => Some("\r\n"),
            Self::MacClassic => Some("\r"),
            Self::PlatformNative => Some(if cfg!(windows) { "\r\n" } else { "\n" }),
            Self::Preserve => None,
        }
    }

    /// Terminador a usar para un archivo cuyo contenido original es `original`.
    pub fn resolve(&self, original: &str) -> &'static str {
        self.fixed_terminator().unwrap_or_else(|| first_terminator(original))
    }

    /// Convierte `\r\n` y `\r` sueltos a `\n`. No asigna si no hay `\r`.
    pub fn to_unix(text: &str) -> Cow<'_, str> {
        if !text.contains('\r') {
            return Cow::Borrowed(text);
        }
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\r' {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            } else {
                out.push(c);
            }
        }
        Cow::Owned(out)
    }

    /// Convierte texto unix al terminador de la política.
    pub fn apply<'a>(&self, unix: &'a str, original: &str) -> Cow<'a, str> {
        match self.resolve(original) {
            "\n" => Cow::Borrowed(unix),
            other => Cow::Owned(unix.replace('\n', other)),
        }
    }

    /// Identidad canónica para igualdad y fingerprint. Incluye el terminador
    /// resuelto: `PlatformNative` produce salidas distintas según la máquina.
    pub fn identity(&self) -> Value {
        json!({ "policy": self.as_str(), "terminator": self.fixed_terminator() })
    }
}

fn first_terminator(text: &str) -> &'static str {
    let bytes = text.as_bytes();
    match bytes.iter().position(|b| *b == b'\r' || *b == b'\n') {
        Some(i) if bytes[i] == b'\n' => "\n",
        Some(i) if bytes.get(i + 1) == Some(&b'\n') => "\r\n",
        Some(_) => "\r",
        None => "\n",
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineEnding {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter()
                 .find(|le| le.as_str() == normalized)
                 .ok_or_else(|| ConfigurationError::UnknownLineEnding(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_unix_handles_mixed_terminators() {
        assert_eq!(LineEnding::to_unix("a\r\nb\rc\nd"), "a\nb\nc\nd");
        assert!(matches!(LineEnding::to_unix("a\nb"), Cow::Borrowed(_)));
    }

    #[test]
    fn apply_converts_to_target_terminator() {
        assert_eq!(LineEnding::Windows.apply("a\nb\n", ""), "a\r\nb\r\n");
        assert_eq!(LineEnding::MacClassic.apply("a\nb", ""), "a\rb");
        assert_eq!(LineEnding::Unix.apply("a\nb", "x\r\ny"), "a\nb");
    }

    #[test]
    fn preserve_uses_first_terminator_of_original() {
        assert_eq!(LineEnding::Preserve.resolve("a\r\nb\nc"), "\r\n");
        assert_eq!(LineEnding::Preserve.resolve("a\rb"), "\r");
        assert_eq!(LineEnding::Preserve.resolve("a\nb\r\n"), "\n");
        assert_eq!(LineEnding::Preserve.resolve("no terminator"), "\n");
    }

    #[test]
    fn parses_from_config_strings() {
        assert_eq!("windows".parse::<LineEnding>().unwrap(), LineEnding::Windows);
        assert_eq!("Mac-Classic".parse::<LineEnding>().unwrap(), LineEnding::MacClassic);
        assert!(matches!("dos".parse::<LineEnding>(), Err(ConfigurationError::UnknownLineEnding(_))));
    }

    #[test]
    fn identities_are_distinct() {
        for (i, a) in LineEnding::ALL.iter().enumerate() {
            for b in LineEnding::ALL.iter().skip(i + 1) {
                assert_ne!(a.identity(), b.identity());
            }
        }
    }
}
