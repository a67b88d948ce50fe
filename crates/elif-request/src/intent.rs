//! The interpreted form of a request

use crate::method::HttpMethod;
use elif_validation::{Validate, ValidationResult};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// What a client asked for: method, API version, module, scene and the
/// sanitized parameters.
///
/// Built only by the resolver and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestIntent {
    method: HttpMethod,
    api_version: Option<f64>,
    module_name: Option<String>,
    scene_name: Option<String>,
    parameters: HashMap<String, Value>,
}

impl RequestIntent {
    pub(crate) fn new(
        method: HttpMethod,
        api_version: Option<f64>,
        module_name: Option<String>,
        scene_name: Option<String>,
        parameters: HashMap<String, Value>,
    ) -> Self {
        Self {
            method,
            api_version,
            module_name,
            scene_name,
            parameters,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Version named in the path, `None` when the path had no version segment
    pub fn api_version(&self) -> Option<f64> {
        self.api_version
    }

    pub fn module_name(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    pub fn scene_name(&self) -> Option<&str> {
        self.scene_name.as_deref()
    }

    pub fn parameters(&self) -> &HashMap<String, Value> {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    /// Run declarative validation over the parameters
    pub async fn validate_parameters<V>(&self, validator: &V) -> ValidationResult<()>
    where
        V: Validate + ?Sized,
    {
        validator.validate(&self.parameters).await
    }
}
