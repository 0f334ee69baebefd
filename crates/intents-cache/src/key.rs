//! Cache key derivation

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Named parameters that together identify one cached call.
///
/// Entries are kept sorted by name, so the insertion order never reaches the
/// derived key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallParameters(BTreeMap<String, Value>);

impl CallParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialize with object keys sorted at every depth
    pub fn canonical_json(&self) -> String {
        let mut out = String::new();
        out.push('{');
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_string(&mut out, name);
            out.push(':');
            write_canonical(&mut out, value);
        }
        out.push('}');
        out
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for CallParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

impl From<serde_json::Map<String, Value>> for CallParameters {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

/// Storage key for a (namespace, parameters) pair.
///
/// Lowercase hex SHA-256, stable across processes and platforms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn derive(namespace: &str, params: &CallParameters) -> Self {
        // Length prefix keeps the namespace boundary unambiguous
        let material = format!(
            "{}:{}\n{}",
            namespace.len(),
            namespace,
            params.canonical_json()
        );
        Self(format!("{:x}", Sha256::digest(material.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn write_canonical(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (name, nested)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, name);
                out.push(':');
                write_canonical(out, nested);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, item);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push_str(&Value::String(s.to_string()).to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insertion_order_does_not_matter() {
        let a = CallParameters::new()
            .with("model", "gemini-2.0-flash-exp")
            .with("query", "weather in Oslo");
        let b = CallParameters::new()
            .with("query", "weather in Oslo")
            .with("model", "gemini-2.0-flash-exp");

        assert_eq!(
            CacheKey::derive("search_web_google", &a),
            CacheKey::derive("search_web_google", &b)
        );
    }

    #[test]
    fn test_nested_objects_are_canonical() {
        let a = CallParameters::new().with("filter", json!({"b": 1, "a": [ {"y": 2, "x": 1} ]}));
        let b = CallParameters::new().with("filter", json!({"a": [ {"x": 1, "y": 2} ], "b": 1}));

        assert_eq!(a.canonical_json(), b.canonical_json());
        assert_eq!(a.canonical_json(), r#"{"filter":{"a":[{"x":1,"y":2}],"b":1}}"#);
    }

    #[test]
    fn test_known_digest_is_stable() {
        let params = CallParameters::new().with("query", "rust");
        let key = CacheKey::derive("ns", &params);

        // Same material always hashes the same, in any process
        let expected = format!("{:x}", Sha256::digest(b"2:ns\n{\"query\":\"rust\"}"));
        assert_eq!(key.as_str(), expected);
        assert_eq!(key.as_str().len(), 64);
    }

    #[test]
    fn test_namespace_and_values_change_the_key() {
        let params = CallParameters::new().with("query", "rust");
        let other = CallParameters::new().with("query", "rust lang");

        assert_ne!(CacheKey::derive("a", &params), CacheKey::derive("b", &params));
        assert_ne!(CacheKey::derive("a", &params), CacheKey::derive("a", &other));
    }

    #[test]
    fn test_from_iterator_and_map() {
        let from_iter: CallParameters = vec![("query", "x"), ("model", "m")].into_iter().collect();
        let map = json!({"model": "m", "query": "x"});
        let from_map = CallParameters::from(map.as_object().unwrap().clone());

        assert_eq!(from_iter, from_map);
        assert_eq!(from_iter.len(), 2);
        assert_eq!(from_iter.get("model"), Some(&json!("m")));
    }
}
