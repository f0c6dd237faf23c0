//! Módulo de hashing y canonicalización JSON.

pub mod canonical_json;
pub mod hash;

pub use canonical_json::{to_canonical_bytes, to_canonical_json};
pub use hash::{hash_bytes, hash_bytes_hex};
