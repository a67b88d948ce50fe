//! Validation error types and handling

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

pub type ValidationResult<T> = Result<T, ValidationErrors>;

/// Which generic rule a value failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatReason {
    /// Characters outside the accepted class
    Format,
    /// Length outside the configured bounds
    Length,
    /// Absent value for a field that is not nullable
    Nullable,
}

impl FormatReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatReason::Format => "format",
            FormatReason::Length => "length",
            FormatReason::Nullable => "nullable",
        }
    }
}

impl fmt::Display for FormatReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an email-shaped value breaks RFC 5322
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RfcViolationKind {
    /// Local part over 64, domain part over 255 or address over 256 bytes
    Length,
    /// Local or domain part does not follow the address grammar
    Grammar,
}

/// Classified outcome of a failed format check
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatViolation {
    #[error("value failed the {reason} rule")]
    Format { reason: FormatReason },

    #[error("mail address violates RFC 5322 ({kind:?})")]
    RfcViolation { kind: RfcViolationKind },
}

impl FormatViolation {
    pub fn format() -> Self {
        FormatViolation::Format {
            reason: FormatReason::Format,
        }
    }

    pub fn length() -> Self {
        FormatViolation::Format {
            reason: FormatReason::Length,
        }
    }

    pub fn nullable() -> Self {
        FormatViolation::Format {
            reason: FormatReason::Nullable,
        }
    }

    pub fn rfc(kind: RfcViolationKind) -> Self {
        FormatViolation::RfcViolation { kind }
    }

    /// Reason code reported to API clients
    pub fn code(&self) -> &'static str {
        match self {
            FormatViolation::Format { reason } => reason.as_str(),
            FormatViolation::RfcViolation { .. } => "rfc_violation",
        }
    }

    pub fn is_rfc_violation(&self) -> bool {
        matches!(self, FormatViolation::RfcViolation { .. })
    }

    /// Turn the violation into a field-level error
    pub fn into_error(self, field: &str) -> ValidationError {
        let message = match self {
            FormatViolation::Format {
                reason: FormatReason::Format,
            } => format!("{} has an invalid format", field),
            FormatViolation::Format {
                reason: FormatReason::Length,
            } => format!("{} has an invalid length", field),
            FormatViolation::Format {
                reason: FormatReason::Nullable,
            } => format!("{} is required", field),
            FormatViolation::RfcViolation {
                kind: RfcViolationKind::Length,
            } => format!("{} exceeds the RFC 5322 length limits", field),
            FormatViolation::RfcViolation {
                kind: RfcViolationKind::Grammar,
            } => format!("{} is not an RFC 5322 compliant address", field),
        };

        let error = ValidationError::with_code(field, message, self.code());
        match self {
            FormatViolation::RfcViolation { kind } => {
                error.context(serde_json::json!({ "rfc_violation": kind }))
            }
            FormatViolation::Format { .. } => error,
        }
    }
}

/// Individual validation error for a specific field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
    /// Error code for programmatic handling
    pub code: String,
    /// Additional context or hints
    pub context: Option<serde_json::Value>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: "validation_failed".to_string(),
            context: None,
        }
    }

    /// Create a validation error with a specific code
    pub fn with_code(
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
            context: None,
        }
    }

    /// Set additional context
    pub fn context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collection of validation errors, typically one per field
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub struct ValidationErrors {
    /// Map of field names to their validation errors
    pub errors: HashMap<String, Vec<ValidationError>>,
}

impl ValidationErrors {
    /// Create a new empty validation errors collection
    pub fn new() -> Self {
        Self {
            errors: HashMap::new(),
        }
    }

    /// Add a single validation error
    pub fn add(&mut self, error: ValidationError) {
        self.errors
            .entry(error.field.clone())
            .or_default()
            .push(error);
    }

    /// Check if there are any validation errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of fields with errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Get total number of validation errors across all fields
    pub fn total_errors(&self) -> usize {
        self.errors.values().map(|v| v.len()).sum()
    }

    /// Get errors for a specific field
    pub fn get_field_errors(&self, field: &str) -> Option<&Vec<ValidationError>> {
        self.errors.get(field)
    }

    /// Check if a specific field has errors
    pub fn has_field_errors(&self, field: &str) -> bool {
        self.errors.get(field).map_or(false, |errors| !errors.is_empty())
    }

    /// Merge another ValidationErrors into this one
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, errors) in other.errors {
            self.errors.entry(field).or_default().extend(errors);
        }
    }

    /// Create ValidationErrors from a single error
    pub fn from_error(error: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.add(error);
        errors
    }

    /// Convert to a JSON-serializable format for API responses
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": "validation_failed",
                "message": "Validation failed",
                "fields": self.errors
            }
        })
    }
}

impl Default for ValidationErrors {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            write!(f, "No validation errors")
        } else {
            write!(f, "Validation failed for {} field(s):", self.errors.len())?;
            for (field, field_errors) in &self.errors {
                for error in field_errors {
                    write!(f, "\n  {}: {}", field, error.message)?;
                }
            }
            Ok(())
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self::from_error(error)
    }
}
