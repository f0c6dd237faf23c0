//! Canonical JSON: claves de objetos ordenadas, sin espacios. Es la forma
//! byte a byte que alimenta equality keys y fingerprints, así que no puede
//! depender del orden de inserción ni del locale.

use serde_json::Value;

pub fn to_canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

pub fn to_canonical_bytes(value: &Value) -> Vec<u8> {
    to_canonical_json(value).into_bytes()
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            // Display de Value escapa strings igual que serde_json::to_string
            out.push_str(&value.to_string());
        }
        Value::Array(arr) => {
            out.push('[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, k) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::from(k.as_str()).to_string());
                out.push(':');
                write_canonical(&map[k], out);
            }
            out.push('}');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_keys_are_sorted_recursively() {
        let v = json!({"b": {"z": 1, "a": [true, null]}, "a": "x"});
        assert_eq!(to_canonical_json(&v), r#"{"a":"x","b":{"a":[true,null],"z":1}}"#);
    }

    #[test]
    fn strings_are_escaped() {
        let v = json!({"k\"": "line\nbreak"});
        assert_eq!(to_canonical_json(&v), r#"{"k\"":"line\nbreak"}"#);
    }

    #[test]
    fn array_order_is_significant() {
        assert_ne!(to_canonical_json(&json!(["a", "b"])), to_canonical_json(&json!(["b", "a"])));
    }
}
