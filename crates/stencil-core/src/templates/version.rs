//! Manifest format version checks

use semver::Version;
use std::path::Path;

/// Highest manifest format version this build understands
pub const SUPPORTED_FORMAT: &str = "1.0.0";

/// Parse a version string, accepting short forms such as `1`, `1.2` and `v1.2.3`
pub fn parse_version(raw: &str) -> Option<Version> {
    let cleaned = raw.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    if cleaned.is_empty() {
        return None;
    }

    let padded = match cleaned.matches('.').count() {
        0 => format!("{}.0.0", cleaned),
        1 => format!("{}.0", cleaned),
        _ => cleaned.to_string(),
    };

    Version::parse(&padded).ok()
}

/// Compare the supported format against the one a manifest declares
///
/// Returns a warning message if the manifest expects a newer format.
/// Unparseable or missing versions are not reported.
pub fn check_compatibility(supported: &str, declared: &str) -> Option<String> {
    let supported_ver = parse_version(supported)?;
    let declared_ver = parse_version(declared)?;

    if supported_ver < declared_ver {
        Some(format!(
            "manifest format {} is newer than the supported format {}",
            declared_ver, supported_ver
        ))
    } else {
        None
    }
}

pub(crate) fn warn_if_newer(path: &Path, declared: &str) {
    if let Some(message) = check_compatibility(SUPPORTED_FORMAT, declared) {
        tracing::warn!(file = %path.display(), "{}", message);
    }
}
