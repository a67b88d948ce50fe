//! Core validation traits for the elif framework

use crate::error::{FormatViolation, ValidationErrors, ValidationResult};
use crate::options::ValidationOptions;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// Synchronous, classified check of a single value.
///
/// Implemented by the format validator family and the mail validator.
/// Implementations hold no mutable state and can be shared across threads.
pub trait FormatCheck: Send + Sync {
    /// Check `value` under `options`
    fn check(&self, value: &Value, options: &ValidationOptions) -> Result<(), FormatViolation>;

    /// Name reported in rule parameters
    fn name(&self) -> &'static str;

    /// Whether `value` is acceptable under `options`
    fn validate(&self, value: &Value, options: &ValidationOptions) -> bool {
        self.check(value, options).is_ok()
    }
}

/// Core validation trait that all field rules implement
#[async_trait]
pub trait ValidationRule: Send + Sync {
    /// Validate a single value
    async fn validate(&self, value: &Value, field: &str) -> ValidationResult<()>;

    /// Get the validation rule name/type
    fn rule_name(&self) -> &'static str;

    /// Get validation rule parameters/configuration as JSON
    fn parameters(&self) -> Option<Value> {
        None
    }
}

/// Trait for validating individual fields
#[async_trait]
pub trait ValidateField: Send + Sync {
    /// Validate a single field value
    async fn validate_field(&self, field: &str, value: &Value) -> ValidationResult<()>;
}

/// Trait for validating entire requests/objects
#[async_trait]
pub trait ValidateRequest: Send + Sync {
    /// Validate the entire request data
    async fn validate_request(&self, data: &HashMap<String, Value>) -> ValidationResult<()>;
}

/// Main validation trait that combines field and request validation
#[async_trait]
pub trait Validate: ValidateField + ValidateRequest + Send + Sync {
    /// Validate both individual fields and the entire request
    async fn validate(&self, data: &HashMap<String, Value>) -> ValidationResult<()> {
        let mut errors = ValidationErrors::new();

        for (field, value) in data {
            if let Err(field_errors) = self.validate_field(field, value).await {
                errors.merge(field_errors);
            }
        }

        if let Err(request_errors) = self.validate_request(data).await {
            errors.merge(request_errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl<T> Validate for T where T: ValidateField + ValidateRequest + Send + Sync {}
