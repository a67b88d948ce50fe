//! API version detection in the first path segment
//!
//! A version segment is `v` (either case) followed by digits, a separator
//! and digits, e.g. `v1.0`. The matcher is deliberately lenient about
//! what sits between the digit runs so that a segment such as `v100` or
//! `v1_0` is still recognised as an attempted version; the resolver then
//! decides whether the configured separator was actually used.

use crate::errors::VersioningViolation;
use regex::Regex;

/// Outcome of matching a single path segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMatch {
    pub matched: bool,
    /// The text after the leading `v`; empty when nothing matched
    pub raw_text: String,
}

impl VersionMatch {
    fn none() -> Self {
        Self {
            matched: false,
            raw_text: String::new(),
        }
    }

    /// Whether the configured separator occurs in the captured text
    pub fn uses_separator(&self, separator: &str) -> bool {
        !separator.is_empty() && self.raw_text.contains(separator)
    }

    /// Parse the captured text as a decimal version number.
    ///
    /// Every occurrence of `separator` is replaced by `.` first.
    pub fn normalized(&self, separator: &str) -> Result<f64, VersioningViolation> {
        let text = self.raw_text.replace(separator, ".");
        text.parse::<f64>()
            .ok()
            .filter(|version| version.is_finite())
            .ok_or_else(|| VersioningViolation::Malformed {
                text: self.raw_text.clone(),
            })
    }
}

/// Compiled version pattern for one separator
#[derive(Debug, Clone)]
pub struct VersionMatcher {
    separator: String,
    pattern: Regex,
}

impl VersionMatcher {
    pub fn new(separator: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"(?i)^v([0-9]+(?:{}|[^0-9]*)[0-9]+)$",
            regex::escape(separator)
        ))?;

        Ok(Self {
            separator: separator.to_string(),
            pattern,
        })
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn match_segment(&self, segment: &str) -> VersionMatch {
        match self.pattern.captures(segment).and_then(|caps| caps.get(1)) {
            Some(text) => VersionMatch {
                matched: true,
                raw_text: text.as_str().to_string(),
            },
            None => VersionMatch::none(),
        }
    }
}

/// One-shot form of [`VersionMatcher::match_segment`]
pub fn match_version(segment: &str, separator: &str) -> Result<VersionMatch, regex::Error> {
    Ok(VersionMatcher::new(separator)?.match_segment(segment))
}
