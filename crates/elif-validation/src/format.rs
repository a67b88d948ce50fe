//! Character-class format validation
//!
//! A [`FormatValidator`] is built from a [`FormatSpec`]: a base character
//! class plus the options the variant seeds. The variants of the built-in
//! family differ only in that data, see [`FormatKind`].
//!
//! The anchored pattern used for a call is derived from the options in
//! effect and cached per flag combination, so a single validator can be
//! shared between threads without locking.

use crate::error::FormatViolation;
use crate::options::ValidationOptions;
use crate::traits::FormatCheck;
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

const NUMERIC_CLASS: &str = "[0-9]";

// CJK punctuation, kana, CJK ideographs and the full-width forms block.
// U+3000 is left out on purpose: it is whitespace and governed by the
// whitespace option.
const FULL_WIDTH_CLASS: &str = r"[\x{3001}-\x{30FF}\x{3400}-\x{4DBF}\x{4E00}-\x{9FFF}\x{F900}-\x{FAFF}\x{FF01}-\x{FF5E}\x{FFE0}-\x{FFE6}]";

const WHITESPACE_CLASS: &str = r"[ \x{3000}]";

/// Base characters a format accepts before options widen it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterClass {
    /// A regex character class such as `[a-zA-Z]`
    Pattern(&'static str),
    /// No base characters; only what the options add
    FullWidthOnly,
    /// Every character is accepted once nullability and length pass
    Any,
}

/// Character class plus the options a validator variant seeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub class: CharacterClass,
    pub seed: ValidationOptions,
}

impl FormatSpec {
    pub const fn new(class: CharacterClass, seed: ValidationOptions) -> Self {
        Self { class, seed }
    }

    /// Build the anchored pattern for the given effective options.
    ///
    /// Returns `None` for [`CharacterClass::Any`], which needs no pattern.
    pub fn compose_pattern(&self, options: &ValidationOptions) -> Option<String> {
        let base = match self.class {
            CharacterClass::Any => return None,
            CharacterClass::Pattern(pattern) => Some(pattern),
            CharacterClass::FullWidthOnly => None,
        };

        let alternatives: Vec<&str> = base
            .into_iter()
            .chain(options.allow_numeric.then_some(NUMERIC_CLASS))
            .chain(options.allow_full_width.then_some(FULL_WIDTH_CLASS))
            .chain(options.allow_whitespace.then_some(WHITESPACE_CLASS))
            .collect();

        if alternatives.is_empty() {
            // Checked text is never empty, so this rejects everything.
            return Some("^$".to_string());
        }

        Some(format!("^(?:{})+$", alternatives.join("|")))
    }
}

/// The built-in validator variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    Alphabet,
    Alphanumeric,
    UpperAlphabet,
    FullSizeString,
    TextString,
}

impl FormatKind {
    pub const ALL: [FormatKind; 5] = [
        FormatKind::Alphabet,
        FormatKind::Alphanumeric,
        FormatKind::UpperAlphabet,
        FormatKind::FullSizeString,
        FormatKind::TextString,
    ];

    pub fn spec(&self) -> FormatSpec {
        let defaults = ValidationOptions::DEFAULT;
        match self {
            FormatKind::Alphabet => FormatSpec::new(CharacterClass::Pattern("[a-zA-Z]"), defaults),
            FormatKind::Alphanumeric => FormatSpec::new(
                CharacterClass::Pattern("[a-zA-Z0-9]"),
                defaults.with_numeric(),
            ),
            FormatKind::UpperAlphabet => FormatSpec::new(CharacterClass::Pattern("[A-Z]"), defaults),
            FormatKind::FullSizeString => {
                FormatSpec::new(CharacterClass::FullWidthOnly, defaults.with_full_width())
            }
            FormatKind::TextString => FormatSpec::new(CharacterClass::Any, defaults),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FormatKind::Alphabet => "alphabet",
            FormatKind::Alphanumeric => "alphanumeric",
            FormatKind::UpperAlphabet => "upper_alphabet",
            FormatKind::FullSizeString => "full_size_string",
            FormatKind::TextString => "text_string",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormatKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown format kind: {}", s))
    }
}

/// Validator deciding whether a value fits a [`FormatSpec`]
#[derive(Debug, Clone)]
pub struct FormatValidator {
    spec: FormatSpec,
    name: &'static str,
    // Indexed by whitespace | numeric << 1 | full width << 2.
    patterns: [OnceCell<Regex>; 8],
}

impl FormatValidator {
    /// Create a validator for a custom spec.
    ///
    /// The widest pattern the spec can produce is compiled up front so a
    /// malformed base class is reported here rather than at check time.
    pub fn new(spec: FormatSpec) -> Result<Self, regex::Error> {
        let validator = Self::from_spec(spec, "format");
        let widest = ValidationOptions::DEFAULT
            .with_whitespace()
            .with_numeric()
            .with_full_width();
        validator.pattern_for(&widest)?;
        Ok(validator)
    }

    /// Create one of the built-in variants
    pub fn from_kind(kind: FormatKind) -> Self {
        Self::from_spec(kind.spec(), kind.name())
    }

    fn from_spec(spec: FormatSpec, name: &'static str) -> Self {
        Self {
            spec,
            name,
            patterns: Default::default(),
        }
    }

    /// Latin letters
    pub fn alphabet() -> Self {
        Self::from_kind(FormatKind::Alphabet)
    }

    /// Latin letters and Arabic numerals
    pub fn alphanumeric() -> Self {
        Self::from_kind(FormatKind::Alphanumeric)
    }

    /// Upper-case Latin letters
    pub fn upper_alphabet() -> Self {
        Self::from_kind(FormatKind::UpperAlphabet)
    }

    /// Full-width characters
    pub fn full_size_string() -> Self {
        Self::from_kind(FormatKind::FullSizeString)
    }

    /// Free text
    pub fn text_string() -> Self {
        Self::from_kind(FormatKind::TextString)
    }

    pub fn spec(&self) -> &FormatSpec {
        &self.spec
    }

    /// Check `value`, reporting which rule it failed
    pub fn check(&self, value: &Value, options: &ValidationOptions) -> Result<(), FormatViolation> {
        let options = options.merged_with(&self.spec.seed);

        if is_absent(value) {
            return if options.nullable {
                Ok(())
            } else {
                Err(FormatViolation::nullable())
            };
        }

        let text = stringify(value).ok_or_else(FormatViolation::format)?;
        self.check_text(&text, &options)
    }

    /// Check a string value
    pub fn check_str(&self, value: &str, options: &ValidationOptions) -> Result<(), FormatViolation> {
        let options = options.merged_with(&self.spec.seed);

        if value.is_empty() {
            return if options.nullable {
                Ok(())
            } else {
                Err(FormatViolation::nullable())
            };
        }

        self.check_text(value, &options)
    }

    /// Whether `value` is acceptable
    pub fn validate(&self, value: &Value, options: &ValidationOptions) -> bool {
        self.check(value, options).is_ok()
    }

    fn check_text(&self, text: &str, options: &ValidationOptions) -> Result<(), FormatViolation> {
        if !options.accepts_length(text.chars().count()) {
            return Err(FormatViolation::length());
        }

        if self.spec.class == CharacterClass::Any {
            return Ok(());
        }

        if !options.allow_whitespace && text.chars().any(char::is_whitespace) {
            return Err(FormatViolation::format());
        }

        let pattern = match self.pattern_for(options) {
            Ok(Some(pattern)) => pattern,
            Ok(None) => return Ok(()),
            Err(error) => {
                tracing::error!(
                    target: "elif::validation",
                    validator = self.name,
                    %error,
                    "format pattern failed to compile"
                );
                return Err(FormatViolation::format());
            }
        };

        if pattern.is_match(text) {
            Ok(())
        } else {
            Err(FormatViolation::format())
        }
    }

    fn pattern_for(&self, options: &ValidationOptions) -> Result<Option<&Regex>, regex::Error> {
        let slot = usize::from(options.allow_whitespace)
            | usize::from(options.allow_numeric) << 1
            | usize::from(options.allow_full_width) << 2;

        let cell = &self.patterns[slot];
        if let Some(pattern) = cell.get() {
            return Ok(Some(pattern));
        }

        match self.spec.compose_pattern(options) {
            None => Ok(None),
            Some(pattern) => cell.get_or_try_init(|| Regex::new(&pattern)).map(Some),
        }
    }
}

impl FormatCheck for FormatValidator {
    fn check(&self, value: &Value, options: &ValidationOptions) -> Result<(), FormatViolation> {
        FormatValidator::check(self, value, options)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Values treated as "not provided": null, `""`, `false`, `[]` and `{}`
pub fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) => false,
    }
}

/// Text form of a scalar; composite values have none
fn stringify(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) => Some(Cow::Borrowed(text.as_str())),
        Value::Number(number) => Some(Cow::Owned(number.to_string())),
        Value::Bool(true) => Some(Cow::Borrowed("1")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> ValidationOptions {
        ValidationOptions::DEFAULT
    }

    #[test]
    fn test_alphabet_accepts_latin_letters() {
        let validator = FormatValidator::alphabet();
        for value in ["a", "z", "A", "Z", "abc", "xyz", "ABC", "XYZ"] {
            assert!(validator.validate(&json!(value), &defaults()), "{} should pass", value);
        }
    }

    #[test]
    fn test_alphabet_rejects_other_characters() {
        let validator = FormatValidator::alphabet();
        let rejected = [
            "abc1",
            "1a",
            "Z1",
            "a b c",
            "!\"#$%&'()=~|-^\\[]{}/?_*:;+`@,.<>",
            "ひらがな",
            "漢字1",
            "ｶﾀｶﾅ",
            "カタカナ",
            "abcひらがな",
        ];

        for value in rejected {
            assert_eq!(
                validator.check(&json!(value), &defaults()),
                Err(FormatViolation::format()),
                "{} should fail with a format error",
                value
            );
        }
    }

    #[test]
    fn test_whitespace_option() {
        let validator = FormatValidator::alphabet();
        let options = defaults().with_whitespace();

        assert!(validator.validate(&json!("a b c"), &options));
        assert!(validator.validate(&json!("A\u{3000}B\u{3000}C"), &options));
        assert!(!validator.validate(&json!("a\tb"), &options));
        assert!(!validator.validate(&json!("ひ ら が な"), &options));
        assert!(!validator.validate(&json!("ｶ ﾀ ｶ ﾅ"), &options));
    }

    #[test]
    fn test_length_bounds() {
        let validator = FormatValidator::alphabet();
        let options = defaults().with_range(2, 5);

        assert_eq!(
            validator.check(&json!("a"), &options),
            Err(FormatViolation::length())
        );
        for value in ["ab", "abc", "abcd", "abcde"] {
            assert!(validator.validate(&json!(value), &options));
        }
        assert_eq!(
            validator.check(&json!("abcdef"), &options),
            Err(FormatViolation::length())
        );
        assert_eq!(
            validator.check(&json!(""), &options),
            Err(FormatViolation::nullable())
        );
    }

    #[test]
    fn test_length_counts_characters() {
        let validator = FormatValidator::full_size_string();
        let options = defaults().with_range(1, 4);
        assert!(validator.validate(&json!("カタカナ"), &options));
        assert_eq!(
            validator.check(&json!("ひらがなを"), &options),
            Err(FormatViolation::length())
        );
    }

    #[test]
    fn test_nullable_accepts_absent_values() {
        let validator = FormatValidator::alphabet();
        let options = defaults().with_nullable();

        for value in [json!(null), json!(""), json!(false), json!([]), json!({})] {
            assert!(validator.validate(&value, &options), "{} should pass", value);
        }

        for value in [json!(0), json!(0.0), json!("0")] {
            assert_eq!(
                validator.check(&value, &options),
                Err(FormatViolation::format()),
                "{} is present and must match the format",
                value
            );
        }
    }

    #[test]
    fn test_absent_values_fail_without_nullable() {
        let validator = FormatValidator::alphabet();

        for value in [json!(null), json!(""), json!(false), json!([])] {
            assert_eq!(
                validator.check(&value, &defaults()),
                Err(FormatViolation::nullable()),
                "{} should be rejected",
                value
            );
        }
        assert!(!validator.validate(&json!(0), &defaults()));
    }

    #[test]
    fn test_composite_values_never_match() {
        let validator = FormatValidator::text_string();
        assert_eq!(
            validator.check(&json!(["abc"]), &defaults()),
            Err(FormatViolation::format())
        );
        assert_eq!(
            validator.check(&json!({"a": "b"}), &defaults()),
            Err(FormatViolation::format())
        );
    }

    #[test]
    fn test_alphanumeric_seeds_numeric() {
        let validator = FormatValidator::alphanumeric();
        assert!(validator.validate(&json!("user123"), &defaults()));
        assert!(validator.validate(&json!(42), &defaults()));
        assert!(!validator.validate(&json!("user_123"), &defaults()));
    }

    #[test]
    fn test_numeric_option_widens_alphabet() {
        let validator = FormatValidator::alphabet();
        assert!(!validator.validate(&json!("abc1"), &defaults()));
        assert!(validator.validate(&json!("abc1"), &defaults().with_numeric()));
    }

    #[test]
    fn test_upper_alphabet() {
        let validator = FormatValidator::upper_alphabet();
        assert!(validator.validate(&json!("ABC"), &defaults()));
        assert!(!validator.validate(&json!("AbC"), &defaults()));
    }

    #[test]
    fn test_full_size_string() {
        let validator = FormatValidator::full_size_string();

        assert!(validator.validate(&json!("ひらがな"), &defaults()));
        assert!(validator.validate(&json!("漢字カタカナ"), &defaults()));
        assert!(validator.validate(&json!("ＡＢＣ１２３"), &defaults()));
        assert!(!validator.validate(&json!("ｶﾀｶﾅ"), &defaults()));
        assert!(!validator.validate(&json!("abc"), &defaults()));
        assert!(!validator.validate(&json!("ひら\u{3000}がな"), &defaults()));
        assert!(validator.validate(&json!("ひら\u{3000}がな"), &defaults().with_whitespace()));
        assert!(validator.validate(&json!("漢字1"), &defaults().with_numeric()));
    }

    #[test]
    fn test_full_width_option_widens_alphabet() {
        let validator = FormatValidator::alphabet();
        assert!(validator.validate(&json!("abc漢字"), &defaults().with_full_width()));
    }

    #[test]
    fn test_text_string_accepts_anything_present() {
        let validator = FormatValidator::text_string();
        assert!(validator.validate(&json!("anything at all!"), &defaults()));
        assert!(validator.validate(&json!("0"), &defaults()));
        assert!(validator.validate(&json!(0), &defaults()));
        assert_eq!(
            validator.check(&json!("toolong"), &defaults().with_max_length(3)),
            Err(FormatViolation::length())
        );
        assert_eq!(
            validator.check(&json!(null), &defaults()),
            Err(FormatViolation::nullable())
        );
    }

    #[test]
    fn test_check_str() {
        let validator = FormatValidator::alphabet();
        assert!(validator.check_str("abc", &defaults()).is_ok());
        assert_eq!(
            validator.check_str("", &defaults()),
            Err(FormatViolation::nullable())
        );
        assert!(validator.check_str("", &defaults().with_nullable()).is_ok());
    }

    #[test]
    fn test_custom_spec() {
        let spec = FormatSpec::new(CharacterClass::Pattern("[a-f]"), ValidationOptions::DEFAULT);
        let validator = FormatValidator::new(spec).unwrap();
        assert!(validator.validate(&json!("cafe"), &defaults()));
        assert!(!validator.validate(&json!("coffee"), &defaults()));
        assert_eq!(FormatCheck::name(&validator), "format");

        let broken = FormatSpec::new(CharacterClass::Pattern("[a-"), ValidationOptions::DEFAULT);
        assert!(FormatValidator::new(broken).is_err());
    }

    #[test]
    fn test_composed_pattern() {
        let spec = FormatKind::Alphabet.spec();
        let pattern = spec
            .compose_pattern(&defaults().with_numeric().with_whitespace())
            .unwrap();
        assert_eq!(pattern, r"^(?:[a-zA-Z]|[0-9]|[ \x{3000}])+$");
        assert_eq!(FormatKind::TextString.spec().compose_pattern(&defaults()), None);
    }

    #[test]
    fn test_shared_validator_across_threads() {
        let validator = std::sync::Arc::new(FormatValidator::alphanumeric());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let validator = validator.clone();
                std::thread::spawn(move || {
                    let options = if i % 2 == 0 {
                        ValidationOptions::DEFAULT
                    } else {
                        ValidationOptions::DEFAULT.with_whitespace()
                    };
                    validator.validate(&json!("abc 123"), &options)
                })
            })
            .collect();

        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![false, true, false, true]);
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in FormatKind::ALL {
            assert_eq!(kind.name().parse::<FormatKind>().unwrap(), kind);
        }
        assert!("hex".parse::<FormatKind>().is_err());
    }
}
