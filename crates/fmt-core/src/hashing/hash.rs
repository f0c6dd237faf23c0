//! Hash helpers – abstracción para poder cambiar de algoritmo sin tocar el
//! resto del core. Usamos blake3 (32 bytes).

/// Digest crudo de una secuencia de bytes.
pub fn hash_bytes(input: &[u8]) -> [u8; 32] {
    *blake3::hash(input).as_bytes()
}

/// Digest hex de una secuencia de bytes (equality keys, contenido de archivos).
pub fn hash_bytes_hex(input: &[u8]) -> String {
    blake3::hash(input).to_hex().to_string()
}
