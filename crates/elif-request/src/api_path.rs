//! Mapping a request intent to API resource paths

use crate::intent::RequestIntent;
use crate::policy::VersioningPolicy;

/// Name of the directory holding the code for `api_version`.
///
/// Empty when the effective version is the default one and strict mode is
/// off, so default-version resources live at the top level. A request
/// without a version segment is served the default version.
pub fn version_directory_name(api_version: Option<f64>, policy: &VersioningPolicy) -> String {
    let version = api_version.unwrap_or(policy.default_version);

    if version == policy.default_version && !policy.strict_mode {
        return String::new();
    }

    // One decimal, ties rounded away from zero
    let rounded = (version * 10.0).round() / 10.0;
    format!("v{}", format!("{:.1}", rounded).replace('.', &policy.dir_separator))
}

/// Join the non-empty path parts with `/`
pub fn api_path(version_dir: &str, module: Option<&str>, scene: Option<&str>) -> String {
    [Some(version_dir), module, scene]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Resource path of `intent` under `policy`
pub fn intent_path(intent: &RequestIntent, policy: &VersioningPolicy) -> String {
    let version_dir = version_directory_name(intent.api_version(), policy);
    api_path(&version_dir, intent.module_name(), intent.scene_name())
}
