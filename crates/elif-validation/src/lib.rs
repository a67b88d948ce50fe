//! # elif-validation
//!
//! Options-driven format validation for the elif framework.
//! A small family of character-class validators plus an RFC 5322 mail
//! address validator, all configured through immutable [`ValidationOptions`]
//! and composable into field [`Rules`].

pub mod error;
pub mod format;
pub mod options;
pub mod rules;
pub mod traits;
pub mod validators;

// Re-exports for easy access
pub use error::{
    FormatReason, FormatViolation, RfcViolationKind, ValidationError, ValidationErrors,
    ValidationResult,
};
pub use format::{is_absent, CharacterClass, FormatKind, FormatSpec, FormatValidator};
pub use options::ValidationOptions;
pub use rules::{FormatRule, Rules};
pub use traits::{FormatCheck, Validate, ValidateField, ValidateRequest, ValidationRule};
pub use validators::MailFormatValidator;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_kind_builds_a_validator() {
        for kind in FormatKind::ALL {
            let validator = FormatValidator::from_kind(kind);
            assert_eq!(FormatCheck::name(&validator), kind.name());
            assert_eq!(kind.name().parse::<FormatKind>(), Ok(kind));
        }
    }

    #[tokio::test]
    async fn test_rules_through_public_api() {
        let rules = Rules::new().format("name", FormatKind::Alphabet, ValidationOptions::DEFAULT);
        let data: std::collections::HashMap<String, serde_json::Value> =
            [("name".to_string(), json!("elif"))].into_iter().collect();

        assert!(rules.validate(&data).await.is_ok());
    }
}
