//! Build orchestration for one platform.
//!
//! Drives the phase sequence clean -> probe -> extract -> describe ->
//! publish -> (annotate) -> done. Probing builds a throwaway
//! single-architecture image whose tag is never registry-prefixed, so it
//! cannot be pushed by accident; the publish build attaches every
//! discovered tool version as an image label.

use std::path::PathBuf;
use tracing::{error, info};

use crate::annotate;
use crate::catalog::Platform;
use crate::clean;
use crate::config::Config;
use crate::constants::label;
use crate::describe;
use crate::docker;
use crate::executor;
use crate::extract::{self, VersionMap};


/// One requested build, as derived from the CLI
pub struct BuildTarget {
    pub platform: Platform,
    pub tag: String,
    pub push: bool,
    pub skip_cleanup: bool,
}

/// Publish and probe tags derived from a target. The probe tag
/// intentionally omits the registry prefix.
pub struct TagSet {
    pub publish: String,
    pub probe: String,
}

impl TagSet {
    pub fn new(config: &Config, platform: Platform, tag: &str) -> Self {
        Self {
            publish: format!("{}-{}:{}", config.registry, platform, tag),
            probe: format!("{}-{}:temp-build-{}", config.local_name, platform, tag),
        }
    }
}

/// Terminal result of one platform's pipeline run
pub struct BuildOutcome {
    pub success: bool,
    pub versions: Option<VersionMap>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Cleaning,
    Probing,
    Extracting,
    Describing,
    Publishing,
    Annotating,
    Done,
    Failed,
}

pub struct BuildPipeline<'a> {
    config: &'a Config,
    target: BuildTarget,
    tags: TagSet,
    dockerfile: PathBuf,
    context: PathBuf,
    versions: VersionMap,
    description: String,
}

impl<'a> BuildPipeline<'a> {
    pub fn new(config: &'a Config, target: BuildTarget) -> Self {
        let tags = TagSet::new(config, target.platform, &target.tag);
        let context = config.containers_dir.join(target.platform.as_str());
        let dockerfile = context.join("Dockerfile");
        Self {
            config,
            target,
            tags,
            dockerfile,
            context,
            versions: VersionMap::new(),
            description: String::new(),
        }
    }

    pub fn run(mut self) -> BuildOutcome {
        let mut phase = Phase::Cleaning;
        loop {
            phase = match phase {
                Phase::Cleaning => self.clean(),
                Phase::Probing => self.probe(),
                Phase::Extracting => self.extract(),
                Phase::Describing => self.describe(),
                Phase::Publishing => self.publish(),
                Phase::Annotating => self.annotate(),
                Phase::Done => {
                    self.remove_probe_image();
                    return BuildOutcome {
                        success: true,
                        versions: Some(self.versions),
                    };
                }
                Phase::Failed => {
                    return BuildOutcome {
                        success: false,
                        versions: None,
                    };
                }
            };
        }
    }

    fn clean(&self) -> Phase {
        if !self.target.skip_cleanup {
            clean::clean_existing_images(self.config, self.target.platform.as_str(), &self.tags);
        }

        if !self.dockerfile.exists() {
            error!("Dockerfile not found at {}", self.dockerfile.display());
            return Phase::Failed;
        }
        Phase::Probing
    }

    fn probe(&self) -> Phase {
        info!("Building temporary image to extract version information...");
        match executor::run_streaming(&self.probe_build_args()) {
            Ok(0) => Phase::Extracting,
            Ok(code) => {
                error!("Error building temporary container (exit status {})", code);
                Phase::Failed
            }
            Err(e) => {
                error!("Error building temporary container: {:#}", e);
                Phase::Failed
            }
        }
    }

    fn extract(&mut self) -> Phase {
        info!("Extracting version information from container...");
        self.versions = extract::extract_versions(self.target.platform, &self.tags.probe);
        Phase::Describing
    }

    fn describe(&mut self) -> Phase {
        self.description = describe::generate(self.target.platform, &self.versions);
        info!("Generated description: {}", self.description);
        if let Ok(json) = serde_json::to_string_pretty(&self.versions) {
            info!("Version info: {}", json);
        }
        Phase::Publishing
    }

    fn publish(&self) -> Phase {
        info!("Building final multi-architecture image...");
        if self.target.push {
            info!("Note: multi-arch builds push one manifest list plus one untagged image per architecture; this is normal");
        } else {
            info!("Note: multi-platform images cannot be loaded locally. Use --push to push to the registry");
        }

        match executor::run_streaming(&self.publish_build_args()) {
            Ok(0) => {
                info!("Successfully built {}", self.tags.publish);
                if self.target.push {
                    Phase::Annotating
                } else {
                    Phase::Done
                }
            }
            Ok(code) => {
                error!("Error building container (exit status {})", code);
                Phase::Failed
            }
            Err(e) => {
                error!("Error building container: {:#}", e);
                Phase::Failed
            }
        }
    }

    fn annotate(&self) -> Phase {
        // The image is already published; annotation failure only warns
        annotate::annotate_manifest(&self.tags.publish, &self.description);
        Phase::Done
    }

    fn remove_probe_image(&self) {
        let _ = executor::run(&["docker", "rmi", self.tags.probe.as_str()]);
    }

    fn source_label(&self) -> String {
        format!("{}={}", label::SOURCE, self.config.source_url)
    }

    /// Single-architecture build of the probe image, loaded into local
    /// storage and never pushed
    fn probe_build_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "docker".into(),
            "buildx".into(),
            "build".into(),
            "--platform".into(),
            docker::host_platform().into(),
            "-t".into(),
            self.tags.probe.clone(),
            "--label".into(),
            self.source_label(),
            "-f".into(),
            self.dockerfile.display().to_string(),
            "--load".into(),
        ];
        args.push(self.context.display().to_string());
        args
    }

    /// Final build: all declared architectures pushed to the registry, or a
    /// host-architecture local load when not pushing
    fn publish_build_args(&self) -> Vec<String> {
        let platforms = if self.target.push {
            self.config.architectures.join(",")
        } else {
            docker::host_platform().to_string()
        };

        let mut args: Vec<String> = vec![
            "docker".into(),
            "buildx".into(),
            "build".into(),
            "--platform".into(),
            platforms,
            "-t".into(),
            self.tags.publish.clone(),
            "--label".into(),
            self.source_label(),
            "--label".into(),
            format!("{}={}", label::DESCRIPTION, self.description),
        ];

        for (tool, version) in &self.versions {
            args.push("--label".into());
            args.push(format!(
                "{}.{}.version={}",
                self.config.label_namespace, tool, version
            ));
        }

        args.push("-f".into());
        args.push(self.dockerfile.display().to_string());

        // Attestations are kept out of the published manifest; they would
        // add extra untagged images per push
        args.push("--provenance=false".into());
        args.push("--sbom=false".into());

        if self.target.push {
            args.push("--push".into());
        } else {
            args.push("--load".into());
        }

        args.push(self.context.display().to_string());
        args
    }
}
