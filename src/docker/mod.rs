//! Docker environment checks
//!
//! Verifies the external build engine is usable before any platform is
//! attempted, and bootstraps a buildx builder instance with multi-arch
//! support when none exists.

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::config::Config;
use crate::constants::arch;
use crate::executor;

/// Build-engine platform string for the host architecture
pub fn host_platform() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => arch::LINUX_AMD64,
        "aarch64" => arch::LINUX_ARM64,
        _ => arch::LINUX_AMD64,
    }
}

/// Check that docker is installed and the daemon is reachable
pub fn check_docker() -> Result<()> {
    which::which("docker").context(
        "Docker command not found. Please install Docker from https://docs.docker.com/get-docker/",
    )?;

    let out = executor::run(&["docker", "version"])?;
    if !out.success() {
        bail!("Docker is not installed or not running. Please ensure the Docker daemon is running");
    }
    Ok(())
}

/// Check buildx availability and make sure a multi-arch capable builder
/// instance exists, creating one if needed
pub fn ensure_buildx(config: &Config) -> Result<()> {
    let out = executor::run(&["docker", "buildx", "version"])?;
    if !out.success() {
        bail!(
            "Docker buildx is not available. Please ensure you have Docker Desktop or Docker CE with the buildx plugin"
        );
    }

    let ls = executor::run(&["docker", "buildx", "ls"])?;
    if ls.success() && ls.stdout.contains("docker-container") {
        return Ok(());
    }

    info!("Creating buildx builder instance...");
    let create = executor::run(&[
        "docker",
        "buildx",
        "create",
        "--name",
        config.builder_name.as_str(),
        "--use",
        "--platform",
        config.architectures.join(",").as_str(),
    ])?;
    if !create.success() {
        bail!(
            "Failed to create buildx builder '{}': {}",
            config.builder_name,
            create.stderr.trim()
        );
    }

    let bootstrap = executor::run(&["docker", "buildx", "inspect", "--bootstrap"])?;
    if !bootstrap.success() {
        bail!(
            "Failed to bootstrap buildx builder: {}",
            bootstrap.stderr.trim()
        );
    }
    Ok(())
}
