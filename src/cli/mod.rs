use clap::Parser;

use crate::constants::tag;

#[derive(Parser)]
#[command(name = "profbox")]
#[command(version, about = "Build multi-architecture profiler environment container images", long_about = None)]
pub struct Cli {
    /// Platform to build a container for, or "all" for every platform
    #[arg(value_name = "PLATFORM")]
    pub platform: String,

    /// Push the built images to the container registry
    #[arg(long)]
    pub push: bool,

    /// Tag for the container image
    #[arg(long, default_value = tag::DEFAULT)]
    pub tag: String,

    /// Skip removing existing containers and images before building
    #[arg(long)]
    pub skip_cleanup: bool,

    /// Patch the pull helper script to pin the image architecture
    #[arg(long)]
    pub pin_pull_platform: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
