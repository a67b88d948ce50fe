//! Request resolution
//!
//! [`RequestResolver`] turns raw request data into a [`RequestIntent`]:
//!
//! 1. the path is tokenized and its segment count checked against the
//!    configured window;
//! 2. the first segment is tested for a version number and, if it is one,
//!    checked against the versioning policy;
//! 3. the next two segments name the module and the scene;
//! 4. the parameters are sanitized.
//!
//! Policies are read from the configuration provider once per call.

use crate::errors::{RequestError, RequestResult, VersioningViolation};
use crate::intent::RequestIntent;
use crate::method::HttpMethod;
use crate::path::tokenize;
use crate::policy::{RequestPolicy, VersioningPolicy};
use crate::sanitizer::sanitize;
use crate::source::RawRequest;
use crate::version::VersionMatcher;
use elif_core::ConfigProvider;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Builds [`RequestIntent`]s from raw requests
pub struct RequestResolver {
    config: Arc<dyn ConfigProvider>,
    // Compiled version patterns keyed by separator.
    matchers: RwLock<HashMap<String, Arc<VersionMatcher>>>,
}

impl std::fmt::Debug for RequestResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestResolver").finish_non_exhaustive()
    }
}

impl RequestResolver {
    pub fn new(config: Arc<dyn ConfigProvider>) -> Self {
        Self {
            config,
            matchers: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &Arc<dyn ConfigProvider> {
        &self.config
    }

    /// Snapshot the current policies from the configuration
    pub fn policy(&self) -> RequestResult<RequestPolicy> {
        Ok(RequestPolicy::from_provider(self.config.as_ref())?)
    }

    /// Interpret `request` under the current configuration
    pub fn resolve(&self, request: &dyn RawRequest) -> RequestResult<RequestIntent> {
        let method = request.method().parse::<HttpMethod>().map_err(|error| {
            tracing::warn!(
                target: "elif::request",
                method = request.method(),
                path = request.path_info(),
                "rejected request with unsupported method"
            );
            error
        })?;

        let policy = self.policy().map_err(|error| {
            tracing::error!(target: "elif::request", %error, "invalid request policy");
            error
        })?;

        let parameters = request.parameters(&method);
        self.resolve_parts(method, request.path_info(), &parameters, &policy)
    }

    /// Interpret already separated request parts under `policy`
    pub fn resolve_parts(
        &self,
        method: HttpMethod,
        raw_path: &str,
        parameters: &HashMap<String, Value>,
        policy: &RequestPolicy,
    ) -> RequestResult<RequestIntent> {
        match self.interpret(method, raw_path, parameters, policy) {
            Ok(intent) => {
                tracing::debug!(
                    target: "elif::request",
                    method = %intent.method(),
                    path = raw_path,
                    api_version = ?intent.api_version(),
                    module = ?intent.module_name(),
                    scene = ?intent.scene_name(),
                    parameters = intent.parameters().len(),
                    "resolved request"
                );
                Ok(intent)
            }
            Err(error) => {
                tracing::warn!(
                    target: "elif::request",
                    method = %method,
                    path = raw_path,
                    code = error.error_code(),
                    %error,
                    "rejected request"
                );
                Err(error)
            }
        }
    }

    fn interpret(
        &self,
        method: HttpMethod,
        raw_path: &str,
        parameters: &HashMap<String, Value>,
        policy: &RequestPolicy,
    ) -> RequestResult<RequestIntent> {
        let segments = tokenize(raw_path);

        let limits = &policy.limits;
        if !limits.accepts(segments.len()) {
            return Err(RequestError::structural(
                segments.len(),
                limits.min_segments,
                limits.max_segments,
            ));
        }

        let api_version = match segments.first() {
            Some(first) => self.detect_version(first, &policy.versioning)?,
            None => None,
        };

        if api_version.is_none() && policy.versioning.requires_version() {
            return Err(VersioningViolation::VersionRequired.into());
        }

        let indexer = usize::from(api_version.is_some());
        let module_name = segments.get(indexer).map(|s| s.to_lowercase());
        let scene_name = segments.get(indexer + 1).map(|s| s.to_lowercase());

        let parameters = sanitize(parameters, policy.security.remove_array_params);

        Ok(RequestIntent::new(
            method,
            api_version,
            module_name,
            scene_name,
            parameters,
        ))
    }

    fn detect_version(
        &self,
        segment: &str,
        versioning: &VersioningPolicy,
    ) -> RequestResult<Option<f64>> {
        let separator = versioning.separator.as_str();
        let found = self.matcher_for(separator)?.match_segment(segment);

        if !found.matched {
            return Ok(None);
        }

        if !versioning.allowed {
            return Err(VersioningViolation::NotPermitted.into());
        }

        if !found.uses_separator(separator) {
            return Err(VersioningViolation::MissingSeparator {
                separator: separator.to_string(),
            }
            .into());
        }

        Ok(Some(found.normalized(separator)?))
    }

    fn matcher_for(&self, separator: &str) -> RequestResult<Arc<VersionMatcher>> {
        if let Some(matcher) = self
            .matchers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(separator)
        {
            return Ok(Arc::clone(matcher));
        }

        let matcher = Arc::new(
            VersionMatcher::new(separator).map_err(|e| RequestError::config(e.to_string()))?,
        );
        self.matchers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(separator.to_string(), Arc::clone(&matcher));

        Ok(matcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elif_core::MapConfig;
    use serde_json::json;
    use tracing_test::traced_test;

    fn resolver() -> RequestResolver {
        RequestResolver::new(Arc::new(MapConfig::new()))
    }

    fn versioned() -> RequestPolicy {
        let mut policy = RequestPolicy::default();
        policy.versioning.allowed = true;
        policy
    }

    fn resolve(path: &str, policy: &RequestPolicy) -> RequestResult<RequestIntent> {
        resolver().resolve_parts(HttpMethod::GET, path, &HashMap::new(), policy)
    }

    #[test]
    fn test_versioned_path() {
        let intent = resolve("/v1.0/top/index", &versioned()).unwrap();

        assert_eq!(intent.api_version(), Some(1.0));
        assert_eq!(intent.module_name(), Some("top"));
        assert_eq!(intent.scene_name(), Some("index"));
    }

    #[test]
    fn test_unversioned_path_is_lower_cased() {
        let intent = resolve("/TOP/INDEX", &RequestPolicy::default()).unwrap();

        assert_eq!(intent.api_version(), None);
        assert_eq!(intent.module_name(), Some("top"));
        assert_eq!(intent.scene_name(), Some("index"));
    }

    #[test]
    fn test_short_paths() {
        let policy = RequestPolicy::default();

        let intent = resolve("/top/", &policy).unwrap();
        assert_eq!(intent.module_name(), Some("top"));
        assert_eq!(intent.scene_name(), None);

        for path in ["", "/"] {
            let intent = resolve(path, &policy).unwrap();
            assert_eq!(intent.api_version(), None);
            assert_eq!(intent.module_name(), None);
            assert_eq!(intent.scene_name(), None);
        }

        let intent = resolve("/v2.5", &versioned()).unwrap();
        assert_eq!(intent.api_version(), Some(2.5));
        assert_eq!(intent.module_name(), None);
    }

    #[test]
    fn test_too_many_segments() {
        assert_eq!(
            resolve("/a/b/c/d", &RequestPolicy::default()),
            Err(RequestError::structural(4, 0, 3))
        );
        // The version segment counts toward the window.
        assert!(matches!(
            resolve("/v1.0/a/b/c", &versioned()),
            Err(RequestError::Structural { segments: 4, .. })
        ));
    }

    #[test]
    fn test_structural_check_precedes_version_detection() {
        assert!(matches!(
            resolve("/v100/a/b/c", &versioned()),
            Err(RequestError::Structural { .. })
        ));
    }

    #[test]
    fn test_versioning_violations() {
        assert_eq!(
            resolve("/v1.0/top/index", &RequestPolicy::default()),
            Err(RequestError::from(VersioningViolation::NotPermitted))
        );
        assert_eq!(
            resolve("/v100/top/index", &versioned()),
            Err(RequestError::from(VersioningViolation::MissingSeparator {
                separator: ".".to_string()
            }))
        );
        assert_eq!(
            resolve("/v1..0/top", &versioned()),
            Err(RequestError::from(VersioningViolation::Malformed {
                text: "1..0".to_string()
            }))
        );
    }

    #[test]
    fn test_disabled_versioning_rejects_any_version_segment() {
        let mut strict_disabled = RequestPolicy::default();
        strict_disabled.versioning.strict_mode = true;

        for policy in [RequestPolicy::default(), strict_disabled] {
            for path in ["/v1.0/top/index", "/v100/top/index", "/v1..0/top"] {
                assert_eq!(
                    resolve(path, &policy),
                    Err(RequestError::from(VersioningViolation::NotPermitted)),
                    "{} with strict_mode = {}",
                    path,
                    policy.versioning.strict_mode
                );
            }
        }
    }

    #[test]
    fn test_custom_separator() {
        let mut policy = versioned();
        policy.versioning.separator = "_".to_string();

        let intent = resolve("/V2_1/shop/list", &policy).unwrap();
        assert_eq!(intent.api_version(), Some(2.1));
        assert_eq!(intent.module_name(), Some("shop"));

        assert!(matches!(
            resolve("/v2.1/shop/list", &policy),
            Err(RequestError::Versioning(
                VersioningViolation::MissingSeparator { .. }
            ))
        ));
    }

    #[test]
    fn test_strict_mode_can_require_a_version() {
        let mut policy = versioned();
        policy.versioning.strict_mode = true;
        assert!(resolve("/top/index", &policy).is_ok());

        policy.versioning.reject_unversioned = true;
        assert_eq!(
            resolve("/top/index", &policy),
            Err(RequestError::from(VersioningViolation::VersionRequired))
        );
        assert!(resolve("/v1.0/top/index", &policy).is_ok());
    }

    #[test]
    fn test_default_version_is_never_substituted() {
        let mut policy = versioned();
        policy.versioning.default_version = 3.0;

        let intent = resolve("/top/index", &policy).unwrap();
        assert_eq!(intent.api_version(), None);
    }

    #[test]
    fn test_parameters_are_sanitized() {
        let params = HashMap::from([
            ("id".to_string(), json!("7")),
            ("idols".to_string(), json!(["miku", "nana"])),
        ]);

        let intent = resolver()
            .resolve_parts(HttpMethod::GET, "/top", &params, &RequestPolicy::default())
            .unwrap();
        assert_eq!(intent.parameter("id"), Some(&json!("7")));
        assert!(intent.parameter("idols").is_none());

        let mut keep = RequestPolicy::default();
        keep.security.remove_array_params = false;
        let intent = resolver()
            .resolve_parts(HttpMethod::GET, "/top", &params, &keep)
            .unwrap();
        assert_eq!(intent.parameters().len(), 2);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let resolver = resolver();
        let policy = versioned();
        let params = HashMap::from([("q".to_string(), json!("x"))]);

        let first = resolver
            .resolve_parts(HttpMethod::POST, "/v1.0/top/index", &params, &policy)
            .unwrap();
        let second = resolver
            .resolve_parts(HttpMethod::POST, "/v1.0/top/index", &params, &policy)
            .unwrap();
        assert_eq!(first, second);
    }

    #[traced_test]
    #[test]
    fn test_outcomes_are_logged() {
        let _ = resolve("/top/index", &RequestPolicy::default());
        assert!(logs_contain("resolved request"));

        let _ = resolve("/a/b/c/d", &RequestPolicy::default());
        assert!(logs_contain("rejected request"));
        assert!(logs_contain("MALFORMED_REQUEST_PATH"));
    }
}
