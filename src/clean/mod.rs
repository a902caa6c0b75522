//! Pre-build cleanup of stale local artifacts.
//!
//! Repeated builds under the same tag otherwise reuse or conflict with
//! stale layers and containers. Every removal is best-effort: failures are
//! logged as warnings and never abort the pipeline, and running cleanup on
//! an already-clean system is a no-op.

use tracing::{info, warn};

use crate::build::TagSet;
use crate::config::Config;
use crate::constants::label;
use crate::executor;

pub fn ancestor_filter(publish_tag: &str) -> String {
    format!("ancestor={}", publish_tag)
}

pub fn source_label_filter(config: &Config) -> String {
    format!("label={}={}", label::SOURCE, config.source_url)
}

/// Remove containers and images left over from previous builds of this
/// platform/tag pair
pub fn clean_existing_images(config: &Config, platform: &str, tags: &TagSet) {
    info!("Cleaning up existing images for {}...", platform);

    remove_containers(&tags.publish);

    for tag in [tags.publish.as_str(), tags.probe.as_str()] {
        remove_image_if_present(tag);
    }

    remove_dangling_labeled_images(config);
}

fn remove_containers(publish_tag: &str) {
    let filter = ancestor_filter(publish_tag);
    match executor::run(&["docker", "ps", "-a", "-q", "--filter", filter.as_str()]) {
        Ok(out) if out.success() && !out.stdout.trim().is_empty() => {
            let ids: Vec<&str> = out.stdout.split_whitespace().collect();
            info!("Found {} containers using {}", ids.len(), publish_tag);
            for id in ids {
                info!("Removing container {}", id);
                if let Err(e) = executor::run(&["docker", "rm", "-f", id]) {
                    warn!("Error removing container {}: {:#}", id, e);
                }
            }
        }
        Ok(_) => {}
        Err(e) => warn!("Error checking for containers: {:#}", e),
    }
}

fn remove_image_if_present(tag: &str) {
    match executor::run(&["docker", "images", "-q", tag]) {
        Ok(out) if out.success() && !out.stdout.trim().is_empty() => {
            info!("Removing image {}", tag);
            if let Err(e) = executor::run(&["docker", "rmi", "-f", tag]) {
                warn!("Error removing image {}: {:#}", tag, e);
            }
        }
        Ok(_) => {}
        Err(e) => warn!("Error removing image {}: {:#}", tag, e),
    }
}

fn remove_dangling_labeled_images(config: &Config) {
    let filter = source_label_filter(config);
    match executor::run(&[
        "docker",
        "images",
        "-q",
        "--filter",
        "dangling=true",
        "--filter",
        filter.as_str(),
    ]) {
        Ok(out) if out.success() && !out.stdout.trim().is_empty() => {
            let ids: Vec<&str> = out.stdout.split_whitespace().collect();
            info!("Found {} dangling images", ids.len());
            for id in ids {
                info!("Removing dangling image {}", id);
                if let Err(e) = executor::run(&["docker", "rmi", "-f", id]) {
                    warn!("Error removing dangling image {}: {:#}", id, e);
                }
            }
        }
        Ok(_) => {}
        Err(e) => warn!("Error removing dangling images: {:#}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ancestor_filter() {
        assert_eq!(
            ancestor_filter("ghcr.io/profbox/profbox-python:latest"),
            "ancestor=ghcr.io/profbox/profbox-python:latest"
        );
    }

    #[test]
    fn test_cleanup_is_a_noop_on_clean_state() {
        // Nothing matches these tags; running cleanup twice must complete
        // without error either time
        let config = Config::default();
        let tags = TagSet {
            publish: "profbox-test-nothing:never-built".to_string(),
            probe: "profbox-test-nothing:temp-build-never-built".to_string(),
        };
        clean_existing_images(&config, "python", &tags);
        clean_existing_images(&config, "python", &tags);
    }

    #[test]
    fn test_source_label_filter() {
        let config = Config::default();
        assert_eq!(
            source_label_filter(&config),
            "label=org.opencontainers.image.source=https://github.com/profbox/profbox"
        );
    }
}
