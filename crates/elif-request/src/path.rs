//! Path tokenizing

/// Split a raw path on `/`, dropping empty segments.
///
/// Total: `""` and `"/"` give no segments, repeated slashes collapse.
pub fn tokenize(raw_path: &str) -> Vec<String> {
    raw_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
