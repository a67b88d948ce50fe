//! Read-only configuration lookup
//!
//! Request handling code never reaches for process-wide configuration
//! state. It receives a [`ConfigProvider`] and reads the keys it needs,
//! falling back to a caller supplied default when a key is absent.

use crate::config::ConfigError;
use serde_json::{Map, Value};

/// Read-only key/value configuration source.
///
/// Keys are dotted paths such as `sys.versioning.allowed`.
pub trait ConfigProvider: Send + Sync {
    /// Look up the raw value stored under `key`
    fn get(&self, key: &str) -> Option<Value>;

    /// Look up a boolean, accepting `true`/`false` strings as well
    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(Value::Bool(value)) => value,
            Some(Value::String(raw)) => match raw.trim().parse::<bool>() {
                Ok(value) => value,
                Err(_) => mismatch(key, "boolean", default),
            },
            Some(Value::Null) | None => default,
            Some(_) => mismatch(key, "boolean", default),
        }
    }

    /// Look up a decimal number, accepting numeric strings as well
    fn get_f64(&self, key: &str, default: f64) -> f64 {
        match self.get(key) {
            Some(Value::Number(number)) => number.as_f64().unwrap_or(default),
            Some(Value::String(raw)) => match raw.trim().parse::<f64>() {
                Ok(value) => value,
                Err(_) => mismatch(key, "decimal number", default),
            },
            Some(Value::Null) | None => default,
            Some(_) => mismatch(key, "decimal number", default),
        }
    }

    /// Look up an unsigned integer
    fn get_usize(&self, key: &str, default: usize) -> usize {
        match self.get(key) {
            Some(Value::Number(number)) => {
                match number.as_u64().and_then(|value| usize::try_from(value).ok()) {
                    Some(value) => value,
                    None => mismatch(key, "unsigned integer", default),
                }
            }
            Some(Value::String(raw)) => match raw.trim().parse::<usize>() {
                Ok(value) => value,
                Err(_) => mismatch(key, "unsigned integer", default),
            },
            Some(Value::Null) | None => default,
            Some(_) => mismatch(key, "unsigned integer", default),
        }
    }

    /// Look up a string; numbers are rendered with their display form
    fn get_str(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(Value::String(value)) => value,
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::Null) | None => default.to_string(),
            Some(_) => mismatch(key, "string", default.to_string()),
        }
    }
}

fn mismatch<T>(key: &str, expected: &str, default: T) -> T {
    tracing::warn!(
        target: "elif::config",
        key,
        expected,
        "configuration value has the wrong type, using default"
    );
    default
}

/// In-memory configuration tree.
///
/// Built from JSON or YAML documents, or programmatically with
/// [`MapConfig::set`]. Dotted keys walk nested objects; a key stored
/// verbatim at the root (dots included) is found as well.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapConfig {
    root: Map<String, Value>,
}

impl MapConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON object
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            Value::Null => Ok(Self::new()),
            other => Err(ConfigError::invalid_value(
                "root",
                other.to_string(),
                "a mapping of configuration keys",
            )),
        }
    }

    /// Parse a YAML document
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_yaml::from_str(source)?;
        Self::from_value(value)
    }

    /// Parse a JSON document
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(source)?;
        Self::from_value(value)
    }

    /// Store `value` under the dotted `key`, creating intermediate objects
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        let parts: Vec<&str> = key.split('.').collect();
        insert_path(&mut self.root, &parts, value.into());
        self
    }

    /// Whether no keys are configured
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.root.get(key) {
            return Some(value);
        }

        let mut parts = key.split('.');
        let first = parts.next()?;
        let mut current = self.root.get(first)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }
}

fn insert_path(map: &mut Map<String, Value>, parts: &[&str], value: Value) {
    match parts {
        [] => {}
        [leaf] => {
            map.insert(leaf.to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_path(child, rest, value);
            }
        }
    }
}

impl ConfigProvider for MapConfig {
    fn get(&self, key: &str) -> Option<Value> {
        self.lookup(key).cloned()
    }
}
