//! Políticas de finales de línea y de codificación. Ambas son valores de
//! configuración puros que participan en la igualdad del `Formatter` y en el
//! fingerprint, porque cambian la salida formateada.

pub mod encoding;
pub mod line_ending;

pub use encoding::EncodingPolicy;
pub use line_ending::LineEnding;
