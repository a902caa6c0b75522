//! Human-readable image description from discovered tool versions.

use crate::catalog::Platform;
use crate::extract::VersionMap;

/// Compose the description sentence for a platform: the fixed base
/// description, followed by the discovered tools in the platform's
/// presentation order. An empty map yields the base description unchanged.
pub fn generate(platform: Platform, versions: &VersionMap) -> String {
    let base = platform.base_description();

    let parts: Vec<String> = platform
        .presentation()
        .iter()
        .filter_map(|(tool, display)| {
            versions
                .get(*tool)
                .map(|version| format!("{} {}", display, version))
        })
        .collect();

    if parts.is_empty() {
        base.to_string()
    } else {
        format!("{}. Includes {}.", base, parts.join(", "))
    }
}
