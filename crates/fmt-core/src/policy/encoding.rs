use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use encoding_rs::Encoding;
use serde::{Serialize, Serializer};

use crate::errors::ConfigurationError;

/// Codificación con la que se decodifican los bytes crudos antes del primer
/// step y se re-codifica la salida.
#[derive(Clone, Copy)]
pub struct EncodingPolicy {
    encoding: &'static Encoding,
}

impl EncodingPolicy {
    /// Rechaza codificaciones que encoding_rs no puede usar como salida
    /// (UTF-16 y `replacement` se re-codificarían como UTF-8).
    pub fn new(encoding: &'static Encoding) -> Result<Self, ConfigurationError> {
        if encoding.output_encoding() != encoding {
            return Err(ConfigurationError::UnsupportedEncoding(encoding.name().to_string()));
        }
        Ok(Self { encoding })
    }

    pub fn utf8() -> Self {
        Self { encoding: encoding_rs::UTF_8 }
    }

    /// Resuelve una etiqueta WHATWG (`utf-8`, `latin1`, `windows-1252`, ...).
    pub fn for_label(label: &str) -> Result<Self, ConfigurationError> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| ConfigurationError::UnknownEncoding(label.to_string()))?;
        Self::new(encoding)
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Decodifica sin reemplazos ni manejo de BOM: `None` si hay secuencias
    /// inválidas. Un BOM queda en el texto y se re-codifica tal cual.
    pub fn decode<'a>(&self, raw: &'a [u8]) -> Option<Cow<'a, str>> {
        self.encoding.decode_without_bom_handling_and_without_replacement(raw)
    }

    /// `None` si algún carácter no es representable en la codificación.
    pub fn encode<'a>(&self, text: &'a str) -> Option<Cow<'a, [u8]>> {
        let (bytes, _, unmappable) = self.encoding.encode(text);
        if unmappable {
            None
        } else {
            Some(bytes)
        }
    }
}

impl Default for EncodingPolicy {
    fn default() -> Self {
        Self::utf8()
    }
}

impl PartialEq for EncodingPolicy {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for EncodingPolicy {}

impl fmt::Debug for EncodingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodingPolicy({})", self.name())
    }
}

impl fmt::Display for EncodingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncodingPolicy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::for_label(s)
    }
}

impl Serialize for EncodingPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_resolve_to_canonical_names() {
        assert_eq!(EncodingPolicy::for_label("UTF8").unwrap().name(), "UTF-8");
        assert_eq!(EncodingPolicy::for_label("latin1").unwrap().name(), "windows-1252");
        assert!(matches!(EncodingPolicy::for_label("klingon"), Err(ConfigurationError::UnknownEncoding(_))));
    }

    #[test]
    fn utf16_is_rejected_for_output() {
        assert!(matches!(EncodingPolicy::for_label("utf-16le"), Err(ConfigurationError::UnsupportedEncoding(_))));
    }

    #[test]
    fn decode_rejects_malformed_input() {
        let utf8 = EncodingPolicy::utf8();
        assert!(utf8.decode(&[0x66, 0xff, 0x6f]).is_none());
        assert_eq!(utf8.decode("ñandú".as_bytes()).unwrap(), "ñandú");
    }

    #[test]
    fn single_byte_round_trip() {
        let latin = EncodingPolicy::for_label("windows-1252").unwrap();
        let text = latin.decode(&[0x63, 0x61, 0x66, 0xe9]).unwrap();
        assert_eq!(text, "café");
        assert_eq!(latin.encode(&text).unwrap().into_owned(), vec![0x63, 0x61, 0x66, 0xe9]);
        assert!(latin.encode("日本").is_none());
    }
}
