//! Immutable validation options
//!
//! [`ValidationOptions`] bundles the named constraints a format check is
//! run with. Every `with_*` method returns a new value and leaves the
//! receiver untouched, so one base options value can be shared freely
//! across validations and threads.

use serde::{Deserialize, Serialize};

/// Named constraints applied to a single format validation call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Minimum length in characters, `None` for unbounded
    pub min_length: Option<usize>,
    /// Maximum length in characters, `None` for unbounded
    pub max_length: Option<usize>,
    /// Accept half-width and full-width spaces
    pub allow_whitespace: bool,
    /// Accept Arabic numerals
    pub allow_numeric: bool,
    /// Accept full-width characters
    pub allow_full_width: bool,
    /// Treat absent-like values as valid
    pub nullable: bool,
}

impl ValidationOptions {
    /// Unconstrained options, the template every call derives from
    pub const DEFAULT: Self = Self::new();

    /// Create options with no bounds and every flag off
    pub const fn new() -> Self {
        Self {
            min_length: None,
            max_length: None,
            allow_whitespace: false,
            allow_numeric: false,
            allow_full_width: false,
            nullable: false,
        }
    }

    /// Allow half-width and full-width spaces
    pub fn with_whitespace(&self) -> Self {
        Self {
            allow_whitespace: true,
            ..*self
        }
    }

    /// Bound the length (in characters) on both sides
    pub fn with_range(&self, min: usize, max: usize) -> Self {
        Self {
            min_length: Some(min),
            max_length: Some(max),
            ..*self
        }
    }

    /// Require at least `min` characters
    pub fn with_min_length(&self, min: usize) -> Self {
        Self {
            min_length: Some(min),
            ..*self
        }
    }

    /// Allow at most `max` characters
    pub fn with_max_length(&self, max: usize) -> Self {
        Self {
            max_length: Some(max),
            ..*self
        }
    }

    /// Accept null, empty string, `false` and empty collections as valid
    pub fn with_nullable(&self) -> Self {
        Self {
            nullable: true,
            ..*self
        }
    }

    /// Accept Arabic numerals in addition to the base character class
    pub fn with_numeric(&self) -> Self {
        Self {
            allow_numeric: true,
            ..*self
        }
    }

    /// Accept full-width characters in addition to the base character class
    pub fn with_full_width(&self) -> Self {
        Self {
            allow_full_width: true,
            ..*self
        }
    }

    /// Combine caller options with the flags a validator variant seeds.
    ///
    /// Flags are OR-ed; length bounds always come from `self`.
    pub fn merged_with(&self, seed: &ValidationOptions) -> Self {
        Self {
            min_length: self.min_length,
            max_length: self.max_length,
            allow_whitespace: self.allow_whitespace || seed.allow_whitespace,
            allow_numeric: self.allow_numeric || seed.allow_numeric,
            allow_full_width: self.allow_full_width || seed.allow_full_width,
            nullable: self.nullable || seed.nullable,
        }
    }

    /// Whether `length` satisfies the configured bounds
    pub fn accepts_length(&self, length: usize) -> bool {
        self.min_length.map_or(true, |min| length >= min)
            && self.max_length.map_or(true, |max| length <= max)
    }
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}
