//! Request intake policies
//!
//! Policies are plain values read from a [`ConfigProvider`] at the start of
//! each resolution, so a configuration change never affects a request that
//! is already being interpreted.

use elif_core::{
    env_source, get_env_or_default, parse_env_or_default, AppConfigTrait, ConfigError,
    ConfigProvider, ConfigSource,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration keys read by [`RequestPolicy::from_provider`]
pub mod keys {
    pub const VERSIONING_ALLOWED: &str = "sys.versioning.allowed";
    pub const VERSIONING_STRICT_MODE: &str = "sys.versioning.strict_mode";
    pub const VERSIONING_DEFAULT_NUM: &str = "sys.versioning.default_num";
    pub const VERSIONING_NUM_SEPARATOR: &str = "sys.versioning.num_separator";
    pub const VERSIONING_DIR_SEPARATOR: &str = "sys.versioning.dir_separator";
    pub const VERSIONING_REJECT_UNVERSIONED: &str = "sys.versioning.reject_unversioned";
    pub const SECURITY_REMOVE_ARRAY_PARAMS: &str = "sys.security.remove_req_array_params";
    pub const REQUEST_MIN_SEGMENTS: &str = "sys.request.min_segments";
    pub const REQUEST_MAX_SEGMENTS: &str = "sys.request.max_segments";
}

/// Default values for request policies
pub struct PolicyDefaults;

impl PolicyDefaults {
    pub const VERSIONING_ALLOWED: bool = false;
    pub const STRICT_MODE: bool = false;
    pub const DEFAULT_VERSION: f64 = 1.0;
    pub const SEPARATOR: &'static str = ".";
    pub const DIR_SEPARATOR: &'static str = ".";
    pub const REJECT_UNVERSIONED: bool = false;
    pub const REMOVE_ARRAY_PARAMS: bool = true;
    pub const MIN_SEGMENTS: usize = 0;
    pub const MAX_SEGMENTS: usize = 3;
}

/// How version segments in the path are treated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersioningPolicy {
    /// Accept a leading version segment at all
    pub allowed: bool,
    /// Always name the version directory, even for the default version
    pub strict_mode: bool,
    /// Version served when none is requested
    pub default_version: f64,
    /// Separator between major and minor number in the path
    pub separator: String,
    /// Separator used when naming version directories
    pub dir_separator: String,
    /// With `strict_mode`, refuse paths without a version segment
    pub reject_unversioned: bool,
}

impl Default for VersioningPolicy {
    fn default() -> Self {
        Self {
            allowed: PolicyDefaults::VERSIONING_ALLOWED,
            strict_mode: PolicyDefaults::STRICT_MODE,
            default_version: PolicyDefaults::DEFAULT_VERSION,
            separator: PolicyDefaults::SEPARATOR.to_string(),
            dir_separator: PolicyDefaults::DIR_SEPARATOR.to_string(),
            reject_unversioned: PolicyDefaults::REJECT_UNVERSIONED,
        }
    }
}

impl VersioningPolicy {
    pub fn from_provider(config: &dyn ConfigProvider) -> Self {
        Self {
            allowed: config.get_bool(keys::VERSIONING_ALLOWED, PolicyDefaults::VERSIONING_ALLOWED),
            strict_mode: config.get_bool(keys::VERSIONING_STRICT_MODE, PolicyDefaults::STRICT_MODE),
            default_version: config
                .get_f64(keys::VERSIONING_DEFAULT_NUM, PolicyDefaults::DEFAULT_VERSION),
            separator: config.get_str(keys::VERSIONING_NUM_SEPARATOR, PolicyDefaults::SEPARATOR),
            dir_separator: config
                .get_str(keys::VERSIONING_DIR_SEPARATOR, PolicyDefaults::DIR_SEPARATOR),
            reject_unversioned: config.get_bool(
                keys::VERSIONING_REJECT_UNVERSIONED,
                PolicyDefaults::REJECT_UNVERSIONED,
            ),
        }
    }

    /// Whether a path without a version segment must be refused
    pub fn requires_version(&self) -> bool {
        self.strict_mode && self.reject_unversioned
    }
}

impl AppConfigTrait for VersioningPolicy {
    fn from_env() -> Result<Self, ConfigError> {
        let allowed = parse_env_or_default(
            "ELIF_VERSIONING_ALLOWED",
            PolicyDefaults::VERSIONING_ALLOWED,
            "true or false",
        )?;
        let strict_mode = parse_env_or_default(
            "ELIF_VERSIONING_STRICT_MODE",
            PolicyDefaults::STRICT_MODE,
            "true or false",
        )?;
        let default_version = parse_env_or_default(
            "ELIF_VERSIONING_DEFAULT_NUM",
            PolicyDefaults::DEFAULT_VERSION,
            "decimal version number",
        )?;
        let separator =
            get_env_or_default("ELIF_VERSIONING_NUM_SEPARATOR", PolicyDefaults::SEPARATOR);
        let dir_separator =
            get_env_or_default("ELIF_VERSIONING_DIR_SEPARATOR", PolicyDefaults::DIR_SEPARATOR);
        let reject_unversioned = parse_env_or_default(
            "ELIF_VERSIONING_REJECT_UNVERSIONED",
            PolicyDefaults::REJECT_UNVERSIONED,
            "true or false",
        )?;

        let policy = VersioningPolicy {
            allowed,
            strict_mode,
            default_version,
            separator,
            dir_separator,
            reject_unversioned,
        };
        policy.validate()?;
        Ok(policy)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.separator.is_empty() {
            return Err(ConfigError::invalid_value(
                "separator",
                "",
                "a non-empty version number separator",
            ));
        }

        if self.separator.chars().any(|c| c.is_ascii_digit()) {
            return Err(ConfigError::invalid_value(
                "separator",
                &self.separator,
                "a separator without digits",
            ));
        }

        if !(self.default_version.is_finite() && self.default_version > 0.0) {
            return Err(ConfigError::invalid_value(
                "default_version",
                self.default_version.to_string(),
                "a positive version number",
            ));
        }

        Ok(())
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        let mut sources = HashMap::new();
        sources.insert(
            "allowed".to_string(),
            env_source("ELIF_VERSIONING_ALLOWED", "false"),
        );
        sources.insert(
            "strict_mode".to_string(),
            env_source("ELIF_VERSIONING_STRICT_MODE", "false"),
        );
        sources.insert(
            "default_version".to_string(),
            env_source("ELIF_VERSIONING_DEFAULT_NUM", "1.0"),
        );
        sources.insert(
            "separator".to_string(),
            env_source("ELIF_VERSIONING_NUM_SEPARATOR", PolicyDefaults::SEPARATOR),
        );
        sources.insert(
            "dir_separator".to_string(),
            env_source("ELIF_VERSIONING_DIR_SEPARATOR", PolicyDefaults::DIR_SEPARATOR),
        );
        sources.insert(
            "reject_unversioned".to_string(),
            env_source("ELIF_VERSIONING_REJECT_UNVERSIONED", "false"),
        );
        sources
    }
}

/// Parameter hygiene rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityPolicy {
    /// Drop array and object valued parameters
    pub remove_array_params: bool,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self {
            remove_array_params: PolicyDefaults::REMOVE_ARRAY_PARAMS,
        }
    }
}

impl SecurityPolicy {
    pub fn from_provider(config: &dyn ConfigProvider) -> Self {
        Self {
            remove_array_params: config.get_bool(
                keys::SECURITY_REMOVE_ARRAY_PARAMS,
                PolicyDefaults::REMOVE_ARRAY_PARAMS,
            ),
        }
    }
}

/// Viable window for the number of raw path segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathLimits {
    pub min_segments: usize,
    pub max_segments: usize,
}

impl Default for PathLimits {
    fn default() -> Self {
        Self {
            min_segments: PolicyDefaults::MIN_SEGMENTS,
            max_segments: PolicyDefaults::MAX_SEGMENTS,
        }
    }
}

impl PathLimits {
    pub fn from_provider(config: &dyn ConfigProvider) -> Self {
        Self {
            min_segments: config.get_usize(keys::REQUEST_MIN_SEGMENTS, PolicyDefaults::MIN_SEGMENTS),
            max_segments: config.get_usize(keys::REQUEST_MAX_SEGMENTS, PolicyDefaults::MAX_SEGMENTS),
        }
    }

    pub fn accepts(&self, segments: usize) -> bool {
        (self.min_segments..=self.max_segments).contains(&segments)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_segments > self.max_segments {
            return Err(ConfigError::validation_failed(format!(
                "min_segments ({}) must not exceed max_segments ({})",
                self.min_segments, self.max_segments
            )));
        }
        Ok(())
    }
}

/// Snapshot of every policy a single resolution needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestPolicy {
    pub versioning: VersioningPolicy,
    pub security: SecurityPolicy,
    pub limits: PathLimits,
}

impl RequestPolicy {
    /// Read and validate the policies from `config`
    pub fn from_provider(config: &dyn ConfigProvider) -> Result<Self, ConfigError> {
        let policy = Self {
            versioning: VersioningPolicy::from_provider(config),
            security: SecurityPolicy::from_provider(config),
            limits: PathLimits::from_provider(config),
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.versioning.validate()?;
        self.limits.validate()
    }
}
