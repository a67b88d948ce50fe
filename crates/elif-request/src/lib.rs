//! # elif-request
//!
//! Request intake for the elif.rs framework.
//!
//! A raw request (HTTP method, path and parameters) is turned into a typed
//! [`RequestIntent`]: the API version named by the first path segment, the
//! module and scene named by the following segments, and the parameters
//! with composite values removed. Versioning, parameter hygiene and the
//! accepted path shape are governed by policies read from an
//! [`elif_core::ConfigProvider`].
//!
//! ```
//! use elif_core::MapConfig;
//! use elif_request::{RequestResolver, StaticRequest};
//! use std::sync::Arc;
//!
//! let config = MapConfig::new().set("sys.versioning.allowed", true);
//! let resolver = RequestResolver::new(Arc::new(config));
//!
//! let request = StaticRequest::from_uri("GET", "/v1.0/Top/Index?page=2").unwrap();
//! let intent = resolver.resolve(&request).unwrap();
//!
//! assert_eq!(intent.api_version(), Some(1.0));
//! assert_eq!(intent.module_name(), Some("top"));
//! assert_eq!(intent.scene_name(), Some("index"));
//! ```

pub mod api_path;
pub mod errors;
pub mod filter;
pub mod intent;
pub mod logging;
pub mod method;
pub mod path;
pub mod policy;
pub mod resolver;
pub mod sanitizer;
pub mod scope;
pub mod source;
pub mod version;

pub use api_path::{api_path, intent_path, version_directory_name};
pub use errors::{RequestError, RequestResult, VersioningViolation};
pub use filter::{Filter, FilterChain, FilterType};
pub use intent::RequestIntent;
pub use logging::{init_logging, LoggingConfig};
pub use method::HttpMethod;
pub use path::tokenize;
pub use policy::{PathLimits, PolicyDefaults, RequestPolicy, SecurityPolicy, VersioningPolicy};
pub use resolver::RequestResolver;
pub use sanitizer::{is_composite, sanitize};
pub use scope::RequestScope;
pub use source::{decode_urlencoded, RawRequest, StaticRequest};
pub use version::{match_version, VersionMatch, VersionMatcher};
