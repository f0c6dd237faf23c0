//! `Formatter`: cadena ordenada de steps + políticas de finales de línea y
//! codificación. Se construye una vez por resolución de configuración y se
//! reutiliza (por referencia, desde varios hilos) para todos los archivos.

pub mod builder;
pub mod core;

pub use self::builder::FormatterBuilder;
pub use self::core::Formatter;
