//! Maintenance patch for the image-pulling helper script.
//!
//! Rewrites `docker pull` invocations in the configured script to pin the
//! platform, so hosts with emulation enabled do not silently pull a
//! foreign-architecture image.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Patch the pull script in place. Missing script is a warning, not an
/// error; an already-patched script is left untouched.
pub fn pin_pull_platform(script: &Path, platform: &str) -> Result<()> {
    info!("Updating {} to pin the pull platform...", script.display());

    if !script.exists() {
        warn!("Could not find {}", script.display());
        return Ok(());
    }

    let content = fs::read_to_string(script)
        .with_context(|| format!("Failed to read {}", script.display()))?;

    match patch_pull_commands(&content, platform) {
        Some(updated) => {
            fs::write(script, updated)
                .with_context(|| format!("Failed to write {}", script.display()))?;
            info!("Updated {} to pull {} images", script.display(), platform);
        }
        None => {
            info!("{} already pins the pull platform", script.display());
        }
    }
    Ok(())
}

/// Pure rewrite of the script text; `None` means nothing to change
pub fn patch_pull_commands(content: &str, platform: &str) -> Option<String> {
    if content.contains("--platform") {
        return None;
    }
    let patched = content.replace(
        "docker pull ",
        &format!("docker pull --platform {} ", platform),
    );
    if patched == content {
        None
    } else {
        Some(patched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_patch_inserts_platform() {
        let patched = patch_pull_commands("docker pull alpine:3.20\n", "linux/arm64").unwrap();
        assert_eq!(patched, "docker pull --platform linux/arm64 alpine:3.20\n");
    }

    #[test]
    fn test_patch_is_idempotent() {
        let once = patch_pull_commands("docker pull alpine:3.20\n", "linux/amd64").unwrap();
        assert_eq!(patch_pull_commands(&once, "linux/amd64"), None);
    }

    #[test]
    fn test_patch_skips_unrelated_script() {
        assert_eq!(patch_pull_commands("echo no pulls here\n", "linux/amd64"), None);
    }

    #[test]
    fn test_pin_pull_platform_missing_script_is_ok() {
        let dir = tempdir().unwrap();
        let script = dir.path().join("does-not-exist.sh");
        assert!(pin_pull_platform(&script, "linux/amd64").is_ok());
    }

    #[test]
    fn test_pin_pull_platform_rewrites_file() {
        let dir = tempdir().unwrap();
        let script = dir.path().join("pull.sh");
        std::fs::write(&script, "#!/bin/sh\ndocker pull busybox:latest\n").unwrap();

        pin_pull_platform(&script, "linux/amd64").unwrap();
        let content = std::fs::read_to_string(&script).unwrap();
        assert!(content.contains("docker pull --platform linux/amd64 busybox:latest"));

        // Second run leaves the file unchanged
        pin_pull_platform(&script, "linux/amd64").unwrap();
        assert_eq!(std::fs::read_to_string(&script).unwrap(), content);
    }
}
