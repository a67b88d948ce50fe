//! # elif-core
//!
//! Configuration foundation shared by the elif.rs request intake crates:
//! the read-only [`ConfigProvider`] boundary, the in-memory [`MapConfig`]
//! provider and the [`AppConfigTrait`] contract for typed configuration
//! sections.

pub mod config;

pub use config::{
    env_source, get_env_or_default, parse_env_or_default, AppConfigTrait, ConfigError,
    ConfigProvider, ConfigSource, MapConfig,
};
