//! Post-push manifest annotation.
//!
//! Attaches the generated description as an index-level OCI annotation on
//! the published tag, in place (source and destination are the same
//! reference). Failure here is never fatal: the image is already live.

use tracing::{info, warn};

use crate::constants::label;
use crate::executor;

pub fn index_annotation(description: &str) -> String {
    format!("index:{}={}", label::DESCRIPTION, description)
}

/// Returns true if the annotation was applied
pub fn annotate_manifest(image_tag: &str, description: &str) -> bool {
    info!("Adding description annotation to manifest...");

    // Inspection can be unavailable depending on registry and CLI setup;
    // proceed to the imagetools call either way
    match executor::run(&["docker", "manifest", "inspect", image_tag]) {
        Ok(out) if out.success() => {}
        Ok(_) => warn!("Could not inspect manifest for {}", image_tag),
        Err(e) => warn!("Could not inspect manifest for {}: {:#}", image_tag, e),
    }

    let annotation = index_annotation(description);
    match executor::run(&[
        "docker",
        "buildx",
        "imagetools",
        "create",
        "--annotation",
        annotation.as_str(),
        "-t",
        image_tag,
        image_tag,
    ]) {
        Ok(out) if out.success() => {
            info!("Successfully added description annotation to manifest");
            true
        }
        Ok(out) => {
            let reason = if out.stderr.trim().is_empty() {
                "unknown error".to_string()
            } else {
                out.stderr.trim().to_string()
            };
            warn!("Could not annotate manifest: {}", reason);
            false
        }
        Err(e) => {
            warn!("Error annotating manifest: {:#}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_annotation_format() {
        assert_eq!(
            index_annotation("Python profiling environment"),
            "index:org.opencontainers.image.description=Python profiling environment"
        );
    }
}
