//! RFC 5322 mail address validator

use crate::error::{FormatViolation, RfcViolationKind};
use crate::format::{is_absent, FormatValidator};
use crate::options::ValidationOptions;
use crate::traits::FormatCheck;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use serde_json::Value;

/// RFC 5321 limit on the local part, in bytes
pub const MAX_LOCAL_PART_LEN: usize = 64;
/// Limit on the domain part including the `@`, in bytes
pub const MAX_DOMAIN_PART_LEN: usize = 255;
/// Limit on the whole address, in bytes
pub const MAX_ADDRESS_LEN: usize = 256;

// Atom characters: anything but specials, space, controls and 8-bit bytes.
const ATOM: &str = r#"[^() <>@,;:".\\\[\]\x00-\x1f\x80-\xff]"#;
const QUOTED_STRING: &str = r#""[^\\\x80-\xff\n\r"]*(?:\\[^\x80-\xff][^\\\x80-\xff\n\r"]*)*""#;
const DOMAIN_LITERAL: &str = r#"\[(?:[^\\\x80-\xff\n\r\[\]]|\\[^\x80-\xff])*\]"#;

static ADDRESS_GRAMMAR: Lazy<Regex> = Lazy::new(|| {
    let local_word = format!("(?:{ATOM}+|{QUOTED_STRING})");
    let domain_word = format!("(?:{ATOM}+|{DOMAIN_LITERAL})");
    let pattern = format!(
        r"(?-u)^{local_word}(?:\.{local_word})*@{domain_word}(?:\.{domain_word})*$"
    );
    Regex::new(&pattern).expect("mail address grammar is a valid pattern")
});

/// Validates mail addresses: a free text check followed by RFC 5322
/// length and grammar checks.
///
/// A value without `@` is a plain [`FormatViolation::Format`] failure;
/// an email-shaped value that breaks the limits or grammar is a
/// [`FormatViolation::RfcViolation`].
#[derive(Debug, Clone)]
pub struct MailFormatValidator {
    base: FormatValidator,
}

impl MailFormatValidator {
    pub fn new() -> Self {
        Self {
            base: FormatValidator::text_string(),
        }
    }

    pub fn check(&self, value: &Value, options: &ValidationOptions) -> Result<(), FormatViolation> {
        self.base.check(value, options)?;

        if options.nullable && is_absent(value) {
            return Ok(());
        }

        match value.as_str() {
            Some(address) => check_rfc(address),
            None => Err(FormatViolation::format()),
        }
    }

    pub fn validate(&self, value: &Value, options: &ValidationOptions) -> bool {
        self.check(value, options).is_ok()
    }
}

impl Default for MailFormatValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatCheck for MailFormatValidator {
    fn check(&self, value: &Value, options: &ValidationOptions) -> Result<(), FormatViolation> {
        MailFormatValidator::check(self, value, options)
    }

    fn name(&self) -> &'static str {
        "mail_address"
    }
}

fn check_rfc(address: &str) -> Result<(), FormatViolation> {
    let at = address.rfind('@').ok_or_else(FormatViolation::format)?;

    let local_len = at;
    let domain_len = address.len() - at;
    if local_len > MAX_LOCAL_PART_LEN
        || domain_len > MAX_DOMAIN_PART_LEN
        || address.len() > MAX_ADDRESS_LEN
    {
        return Err(FormatViolation::rfc(RfcViolationKind::Length));
    }

    if !ADDRESS_GRAMMAR.is_match(address.as_bytes()) {
        return Err(FormatViolation::rfc(RfcViolationKind::Grammar));
    }

    Ok(())
}
