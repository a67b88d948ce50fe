//! Field rules built from format checks, and their composition

use crate::error::{ValidationErrors, ValidationResult};
use crate::format::{FormatKind, FormatValidator};
use crate::options::ValidationOptions;
use crate::traits::{FormatCheck, ValidateField, ValidateRequest, ValidationRule};
use crate::validators::MailFormatValidator;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A format check bound to the options it runs with
#[derive(Clone)]
pub struct FormatRule {
    check: Arc<dyn FormatCheck>,
    options: ValidationOptions,
}

impl std::fmt::Debug for FormatRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRule")
            .field("check", &self.check.name())
            .field("options", &self.options)
            .finish()
    }
}

impl FormatRule {
    pub fn new<C>(check: C, options: ValidationOptions) -> Self
    where
        C: FormatCheck + 'static,
    {
        Self {
            check: Arc::new(check),
            options,
        }
    }

    /// Share an existing check between rules
    pub fn shared(check: Arc<dyn FormatCheck>, options: ValidationOptions) -> Self {
        Self { check, options }
    }

    pub fn kind(kind: FormatKind, options: ValidationOptions) -> Self {
        Self::new(FormatValidator::from_kind(kind), options)
    }

    pub fn mail(options: ValidationOptions) -> Self {
        Self::new(MailFormatValidator::new(), options)
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }
}

#[async_trait]
impl ValidationRule for FormatRule {
    async fn validate(&self, value: &Value, field: &str) -> ValidationResult<()> {
        self.check
            .check(value, &self.options)
            .map_err(|violation| ValidationErrors::from(violation.into_error(field)))
    }

    fn rule_name(&self) -> &'static str {
        self.check.name()
    }

    fn parameters(&self) -> Option<Value> {
        Some(serde_json::json!({
            "check": self.check.name(),
            "options": self.options,
        }))
    }
}

/// Collection of validation rules for the fields of a request
#[derive(Clone)]
pub struct Rules {
    field_rules: HashMap<String, Vec<Arc<dyn ValidationRule>>>,
}

impl std::fmt::Debug for Rules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rules")
            .field("field_rules_count", &self.field_rules.len())
            .field("validated_fields", &self.get_validated_fields())
            .finish()
    }
}

impl Rules {
    pub fn new() -> Self {
        Self {
            field_rules: HashMap::new(),
        }
    }

    /// Add a validation rule for a specific field
    pub fn field<R>(mut self, field: impl Into<String>, rule: R) -> Self
    where
        R: ValidationRule + 'static,
    {
        self.field_rules
            .entry(field.into())
            .or_default()
            .push(Arc::new(rule));
        self
    }

    /// Shorthand for a [`FormatRule`] of a built-in kind
    pub fn format(self, field: impl Into<String>, kind: FormatKind, options: ValidationOptions) -> Self {
        self.field(field, FormatRule::kind(kind, options))
    }

    /// Shorthand for a mail address rule
    pub fn mail(self, field: impl Into<String>, options: ValidationOptions) -> Self {
        self.field(field, FormatRule::mail(options))
    }

    pub fn get_field_rules(&self, field: &str) -> Option<&Vec<Arc<dyn ValidationRule>>> {
        self.field_rules.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.field_rules.is_empty()
    }

    pub fn get_validated_fields(&self) -> Vec<&String> {
        self.field_rules.keys().collect()
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ValidateField for Rules {
    async fn validate_field(&self, field: &str, value: &Value) -> ValidationResult<()> {
        let Some(rules) = self.field_rules.get(field) else {
            return Ok(());
        };

        let mut errors = ValidationErrors::new();
        for rule in rules {
            if let Err(rule_errors) = rule.validate(value, field).await {
                errors.merge(rule_errors);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[async_trait]
impl ValidateRequest for Rules {
    async fn validate_request(&self, data: &HashMap<String, Value>) -> ValidationResult<()> {
        let mut errors = ValidationErrors::new();

        // Fields with rules but no value are checked as null, so that
        // non-nullable fields report a missing value.
        for (field, rules) in &self.field_rules {
            if data.contains_key(field) {
                continue;
            }
            for rule in rules {
                if let Err(rule_errors) = rule.validate(&Value::Null, field).await {
                    errors.merge(rule_errors);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Validate;
    use serde_json::json;

    fn data(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_format_rule_maps_violation_to_field_error() {
        let rule = FormatRule::kind(FormatKind::Alphabet, ValidationOptions::DEFAULT);

        assert!(rule.validate(&json!("abc"), "name").await.is_ok());

        let errors = rule.validate(&json!("abc1"), "name").await.unwrap_err();
        let field_errors = errors.get_field_errors("name").unwrap();
        assert_eq!(field_errors.len(), 1);
        assert_eq!(field_errors[0].code, "format");
    }

    #[tokio::test]
    async fn test_format_rule_parameters() {
        let rule = FormatRule::kind(
            FormatKind::UpperAlphabet,
            ValidationOptions::DEFAULT.with_range(1, 4),
        );

        assert_eq!(rule.rule_name(), "upper_alphabet");
        let params = rule.parameters().unwrap();
        assert_eq!(params["check"], "upper_alphabet");
        assert_eq!(params["options"]["max_length"], 4);
        assert_eq!(params["options"]["nullable"], false);
    }

    #[tokio::test]
    async fn test_rules_aggregate_errors_per_field() {
        let rules = Rules::new()
            .format("code", FormatKind::UpperAlphabet, ValidationOptions::DEFAULT)
            .format(
                "nickname",
                FormatKind::Alphanumeric,
                ValidationOptions::DEFAULT.with_max_length(4),
            )
            .mail("mail", ValidationOptions::DEFAULT);

        let input = data(&[
            ("code", json!("abc")),
            ("nickname", json!("abcdef")),
            ("mail", json!("user@@example.com")),
            ("untracked", json!("anything at all")),
        ]);

        let errors = rules.validate(&input).await.unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get_field_errors("code").unwrap()[0].code, "format");
        assert_eq!(errors.get_field_errors("nickname").unwrap()[0].code, "length");
        assert_eq!(
            errors.get_field_errors("mail").unwrap()[0].code,
            "rfc_violation"
        );
        assert!(!errors.has_field_errors("untracked"));
    }

    #[tokio::test]
    async fn test_missing_fields_follow_nullability() {
        let rules = Rules::new()
            .format("required", FormatKind::Alphabet, ValidationOptions::DEFAULT)
            .format(
                "optional",
                FormatKind::Alphabet,
                ValidationOptions::DEFAULT.with_nullable(),
            );

        let errors = rules.validate(&HashMap::new()).await.unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get_field_errors("required").unwrap()[0].code,
            "nullable"
        );
    }

    #[tokio::test]
    async fn test_valid_request_passes() {
        let rules = Rules::new()
            .format("name", FormatKind::Alphabet, ValidationOptions::DEFAULT.with_whitespace())
            .mail("mail", ValidationOptions::DEFAULT);

        let input = data(&[
            ("name", json!("John Smith")),
            ("mail", json!("john@example.com")),
        ]);

        assert!(rules.validate(&input).await.is_ok());
    }

    #[tokio::test]
    async fn test_error_body_for_api_clients() {
        let rules = Rules::new().format("kana", FormatKind::FullSizeString, ValidationOptions::DEFAULT);
        let errors = rules
            .validate(&data(&[("kana", json!("abc"))]))
            .await
            .unwrap_err();

        let body = errors.to_json();
        assert_eq!(body["error"]["code"], "validation_failed");
        assert_eq!(body["error"]["fields"]["kana"][0]["field"], "kana");
        assert_eq!(body["error"]["fields"]["kana"][0]["code"], "format");
    }

    #[tokio::test]
    async fn test_shared_check_keeps_per_rule_options() {
        let check: Arc<dyn FormatCheck> = Arc::new(FormatValidator::alphabet());
        let short = FormatRule::shared(
            Arc::clone(&check),
            ValidationOptions::DEFAULT.with_max_length(3),
        );
        let optional = FormatRule::shared(check, ValidationOptions::DEFAULT.with_nullable());

        assert!(short.validate(&json!("abc"), "code").await.is_ok());
        let errors = short.validate(&json!("abcd"), "code").await.unwrap_err();
        assert_eq!(errors.get_field_errors("code").unwrap()[0].code, "length");

        assert!(optional.validate(&Value::Null, "code").await.is_ok());
        assert!(short.validate(&Value::Null, "code").await.is_err());
        assert_eq!(optional.rule_name(), short.rule_name());
    }

    #[test]
    fn test_rules_bookkeeping() {
        let rules = Rules::new();
        assert!(rules.is_empty());

        let rules = rules.format("a", FormatKind::Alphabet, ValidationOptions::DEFAULT);
        assert!(!rules.is_empty());
        assert_eq!(rules.get_field_rules("a").unwrap().len(), 1);
        assert!(rules.get_field_rules("b").is_none());
    }
}
