//! Equality keys de steps.
//!
//! Un step participa en el cacheo incremental exponiendo una `EqualityKey`:
//! la forma canónica (JSON canónico) de su nombre y su estado de
//! configuración. La misma key alimenta la igualdad entre steps y el
//! fingerprint de un `Formatter`.
//!
//! Un step cuyo estado no puede reducirse a bytes estables usa la variante
//! `NeverUpToDate`: nunca es igual a ninguna otra key, ni siquiera a la de
//! otra construcción del mismo step, de modo que el host siempre lo trata
//! como "cambiado". Por eso `EqualityKey` implementa `PartialEq` pero no `Eq`.

use std::fmt;

use log::warn;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::hashing::{hash_bytes_hex, to_canonical_bytes};

#[derive(Clone)]
pub enum EqualityKey {
    /// JSON canónico de `{"name": .., "state": ..}`.
    Stable(Vec<u8>),
    /// Nonce por construcción; nunca compara igual.
    NeverUpToDate(Uuid),
}

impl EqualityKey {
    /// Serializa `state` a su forma canónica. Falla si el estado no es
    /// representable en JSON (p. ej. mapas con claves no-string).
    pub fn stable<S: Serialize + ?Sized>(name: &str, state: &S) -> Result<Self, serde_json::Error> {
        let state = serde_json::to_value(state)?;
        let canonical = to_canonical_bytes(&json!({ "name": name, "state": state }));
        Ok(Self::Stable(canonical))
    }

    /// Igual que `stable`, pero degrada a `NeverUpToDate` cuando el estado no
    /// se puede serializar en lugar de propagar el error.
    pub fn from_state<S: Serialize + ?Sized>(name: &str, state: &S) -> Self {
        match Self::stable(name, state) {
            Ok(key) => key,
            Err(e) => {
                warn!("step '{name}' state is not serializable ({e}); treating it as never up to date");
                Self::never_up_to_date()
            }
        }
    }

    pub fn never_up_to_date() -> Self {
        Self::NeverUpToDate(Uuid::new_v4())
    }

    pub fn is_cacheable(&self) -> bool {
        matches!(self, Self::Stable(_))
    }

    /// Bytes canónicos de la key. Para `NeverUpToDate` incluyen el nonce, así
    /// que un fingerprint que contenga la key es distinto en cada construcción.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        match self {
            Self::Stable(bytes) => bytes.clone(),
            Self::NeverUpToDate(nonce) => format!("never-up-to-date:{nonce}").into_bytes(),
        }
    }

    /// Digest hex de la key, apto para persistir y comparar por step.
    pub fn digest(&self) -> String {
        hash_bytes_hex(&self.canonical_bytes())
    }

    /// Representación usada dentro del JSON canónico del fingerprint.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Stable(_) => Value::String(self.digest()),
            Self::NeverUpToDate(nonce) => json!({ "never_up_to_date": nonce.to_string() }),
        }
    }
}

impl PartialEq for EqualityKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Stable(a), Self::Stable(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for EqualityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable(bytes) => write!(f, "Stable({})", String::from_utf8_lossy(bytes)),
            Self::NeverUpToDate(nonce) => write!(f, "NeverUpToDate({nonce})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Imports {
        order: Vec<String>,
        wildcards_last: bool,
    }

    #[test]
    fn same_name_and_state_give_equal_keys() {
        let a = EqualityKey::from_state("importOrder", &Imports { order: vec!["java".into()], wildcards_last: false });
        let b = EqualityKey::from_state("importOrder", &Imports { order: vec!["java".into()], wildcards_last: false });
        assert_eq!(a, b);
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn sequence_content_changes_the_key() {
        let mk = |order: &[&str]| {
            EqualityKey::from_state("importOrder",
                                    &Imports { order: order.iter().map(|s| s.to_string()).collect(),
                                               wildcards_last: false })
        };
        let keys = [mk(&[]), mk(&["a"]), mk(&["b"]), mk(&["a", "b"]), mk(&["b", "a"])];
        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                assert_ne!(keys[i], keys[j], "keys {i} and {j} should differ");
            }
        }
    }

    #[test]
    fn name_participates_in_the_key() {
        assert_ne!(EqualityKey::from_state("a", &()), EqualityKey::from_state("b", &()));
    }

    #[test]
    fn never_up_to_date_is_not_even_equal_to_itself() {
        let k = EqualityKey::never_up_to_date();
        assert_ne!(k, k.clone());
        assert_ne!(EqualityKey::never_up_to_date(), EqualityKey::never_up_to_date());
        assert!(!k.is_cacheable());
    }

    #[test]
    fn unserializable_state_degrades_to_never_up_to_date() {
        let mut state: HashMap<(u8, u8), u8> = HashMap::new();
        state.insert((1, 2), 3);
        let k = EqualityKey::from_state("tupleKeys", &state);
        assert!(!k.is_cacheable());
    }

    #[test]
    fn hash_map_iteration_order_does_not_leak_into_the_key() {
        let mut a = HashMap::new();
        let mut b = HashMap::new();
        for i in 0..32 {
            a.insert(format!("k{i}"), i);
        }
        for i in (0..32).rev() {
            b.insert(format!("k{i}"), i);
        }
        assert_eq!(EqualityKey::from_state("m", &a), EqualityKey::from_state("m", &b));
    }
}
