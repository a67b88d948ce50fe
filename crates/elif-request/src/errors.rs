//! Request intake error types
//!
//! Every failure of request interpretation is a [`RequestError`]. The
//! variants map onto stable error codes and HTTP status classes so the
//! surrounding server can render a consistent error body.

use serde_json::json;
use thiserror::Error;

/// Result type for request intake operations
pub type RequestResult<T> = Result<T, RequestError>;

/// How a version segment breaks the versioning policy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersioningViolation {
    #[error("versioned URLs are not permitted")]
    NotPermitted,

    #[error("version number must use the separator \"{separator}\"")]
    MissingSeparator { separator: String },

    #[error("version number \"{text}\" cannot be parsed")]
    Malformed { text: String },

    #[error("a version segment is required")]
    VersionRequired,
}

/// Request intake errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("Malformed request path: {segments} segment(s), expected {min} to {max}")]
    Structural {
        segments: usize,
        min: usize,
        max: usize,
    },

    #[error("Unsupported operation: {0}")]
    Versioning(#[from] VersioningViolation),

    #[error("Malformed request parameters: {message}")]
    Parameters { message: String },

    #[error("Unsupported HTTP method: {method}")]
    UnsupportedMethod { method: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl RequestError {
    /// Create a structural error
    pub fn structural(segments: usize, min: usize, max: usize) -> Self {
        RequestError::Structural { segments, min, max }
    }

    /// Create a parameter decoding error
    pub fn parameters<T: Into<String>>(message: T) -> Self {
        RequestError::Parameters {
            message: message.into(),
        }
    }

    /// Create an unsupported method error
    pub fn unsupported_method<T: Into<String>>(method: T) -> Self {
        RequestError::UnsupportedMethod {
            method: method.into(),
        }
    }

    /// Create a configuration error
    pub fn config<T: Into<String>>(message: T) -> Self {
        RequestError::Config {
            message: message.into(),
        }
    }

    /// Get error code for consistent API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::Structural { .. } => "MALFORMED_REQUEST_PATH",
            RequestError::Versioning(VersioningViolation::NotPermitted) => "VERSIONING_NOT_PERMITTED",
            RequestError::Versioning(VersioningViolation::MissingSeparator { .. }) => {
                "VERSION_SEPARATOR_MISSING"
            }
            RequestError::Versioning(VersioningViolation::Malformed { .. }) => "MALFORMED_VERSION",
            RequestError::Versioning(VersioningViolation::VersionRequired) => "VERSION_REQUIRED",
            RequestError::Parameters { .. } => "MALFORMED_PARAMETERS",
            RequestError::UnsupportedMethod { .. } => "UNSUPPORTED_METHOD",
            RequestError::Config { .. } => "CONFIGURATION_ERROR",
        }
    }

    /// HTTP status the error should be answered with
    pub fn status_code(&self) -> u16 {
        match self {
            RequestError::Structural { .. }
            | RequestError::Versioning(_)
            | RequestError::Parameters { .. } => 400,
            RequestError::UnsupportedMethod { .. } => 405,
            RequestError::Config { .. } => 500,
        }
    }

    /// Whether the client is at fault
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Render the API error body
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        })
    }
}

// Convert from elif-core ConfigError
impl From<elif_core::ConfigError> for RequestError {
    fn from(err: elif_core::ConfigError) -> Self {
        RequestError::Config {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            RequestError::structural(4, 0, 3).error_code(),
            "MALFORMED_REQUEST_PATH"
        );
        assert_eq!(
            RequestError::from(VersioningViolation::NotPermitted).error_code(),
            "VERSIONING_NOT_PERMITTED"
        );
        assert_eq!(
            RequestError::unsupported_method("BREW").error_code(),
            "UNSUPPORTED_METHOD"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(RequestError::structural(4, 0, 3).status_code(), 400);
        assert_eq!(
            RequestError::from(VersioningViolation::VersionRequired).status_code(),
            400
        );
        assert_eq!(RequestError::unsupported_method("BREW").status_code(), 405);
        assert_eq!(RequestError::config("bad").status_code(), 500);
        assert!(!RequestError::config("bad").is_client_error());
    }

    #[test]
    fn test_config_error_conversion() {
        let config_error = elif_core::ConfigError::validation_failed("Test validation error");
        let request_error = RequestError::from(config_error);
        assert!(matches!(request_error, RequestError::Config { .. }));
    }

    #[test]
    fn test_error_body() {
        let error = RequestError::from(VersioningViolation::MissingSeparator {
            separator: ".".to_string(),
        });
        let body = error.to_json();

        assert_eq!(body["error"]["code"], "VERSION_SEPARATOR_MISSING");
        assert_eq!(
            body["error"]["message"],
            "Unsupported operation: version number must use the separator \".\""
        );
    }
}
