//! Where raw request data comes from
//!
//! The resolver never reads process-global request state. It is handed a
//! [`RawRequest`], which the HTTP layer implements over its own request
//! type; [`StaticRequest`] is the owned implementation used by tests and
//! by callers that already hold the pieces.

use crate::errors::{RequestError, RequestResult};
use crate::method::HttpMethod;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Raw request data as received from the server
pub trait RawRequest: Send + Sync {
    /// HTTP method as sent by the client
    fn method(&self) -> &str;

    /// Path portion of the request URI
    fn path_info(&self) -> &str;

    /// Parameters visible to `method`
    fn parameters(&self, method: &HttpMethod) -> HashMap<String, Value>;
}

/// Owned request data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticRequest {
    method: String,
    path_info: String,
    query: HashMap<String, Value>,
    body: HashMap<String, Value>,
}

impl StaticRequest {
    pub fn new(method: impl Into<String>, path_info: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path_info: path_info.into(),
            ..Self::default()
        }
    }

    /// Split `uri` into path and query, decoding the query string
    pub fn from_uri(method: impl Into<String>, uri: &str) -> RequestResult<Self> {
        let uri = uri.split_once('#').map_or(uri, |(before, _)| before);
        let (path, query) = uri.split_once('?').unwrap_or((uri, ""));

        Ok(Self {
            method: method.into(),
            path_info: path.to_string(),
            query: decode_urlencoded(query)?,
            body: HashMap::new(),
        })
    }

    /// Attach an `application/x-www-form-urlencoded` body
    pub fn with_form_body(mut self, body: &str) -> RequestResult<Self> {
        self.body = decode_urlencoded(body)?;
        Ok(self)
    }

    /// Add a query parameter
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a body parameter
    pub fn with_body_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }
}

impl RawRequest for StaticRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn path_info(&self) -> &str {
        &self.path_info
    }

    fn parameters(&self, method: &HttpMethod) -> HashMap<String, Value> {
        let mut params = self.query.clone();
        if method.carries_body() {
            params.extend(self.body.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        params
    }
}

/// Decode a urlencoded string into parameters.
///
/// `key[]=v` collects into an array and `key[name]=v` into an object,
/// the way form posts encode lists and maps. A plain key given twice
/// keeps the last value.
pub fn decode_urlencoded(input: &str) -> RequestResult<HashMap<String, Value>> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(input).map_err(|e| RequestError::parameters(e.to_string()))?;

    let mut params: HashMap<String, Value> = HashMap::new();
    for (key, value) in pairs {
        match split_bracket(&key) {
            Some((name, "")) => {
                let entry = params
                    .entry(name.to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
                match entry {
                    Value::Array(items) => items.push(Value::String(value)),
                    other => *other = Value::Array(vec![Value::String(value)]),
                }
            }
            Some((name, field)) => {
                let entry = params
                    .entry(name.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !entry.is_object() {
                    *entry = Value::Object(Map::new());
                }
                if let Value::Object(map) = entry {
                    map.insert(field.to_string(), Value::String(value));
                }
            }
            None => {
                params.insert(key, Value::String(value));
            }
        }
    }

    Ok(params)
}

// "name[field]" -> ("name", "field"); nested brackets stay in the field.
fn split_bracket(key: &str) -> Option<(&str, &str)> {
    let open = key.find('[')?;
    let inner = key.strip_suffix(']')?;
    if open == 0 {
        return None;
    }
    Some((&key[..open], &inner[open + 1..]))
}
