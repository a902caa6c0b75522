use anyhow::Result;
use clap::Parser;
use profbox::{
    build::{BuildPipeline, BuildTarget},
    catalog::Platform,
    cli::Cli,
    config::Config,
    docker,
    extract::VersionMap,
    pinpull,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;

    // Resolve the requested platforms before touching docker so that a bad
    // platform name is reported as such
    let platforms: Vec<Platform> = if cli.platform == "all" {
        Platform::ALL.to_vec()
    } else {
        vec![cli.platform.parse()?]
    };

    docker::check_docker()?;
    docker::ensure_buildx(&config)?;

    if cli.pin_pull_platform {
        pinpull::pin_pull_platform(&config.pull_script, docker::host_platform())?;
    }

    let bulk = platforms.len() > 1;
    let mut results: Vec<(Platform, VersionMap)> = Vec::new();
    let mut failed: Vec<Platform> = Vec::new();

    for platform in platforms {
        info!("Building {} container...", platform);

        let target = BuildTarget {
            platform,
            tag: cli.tag.clone(),
            push: cli.push,
            skip_cleanup: cli.skip_cleanup,
        };
        let outcome = BuildPipeline::new(&config, target).run();

        if outcome.success {
            results.push((platform, outcome.versions.unwrap_or_default()));
        } else {
            failed.push(platform);
            if bulk {
                error!("Failed to build {}, continuing with other platforms...", platform);
            }
        }
    }

    print_summary(&results);

    if failed.is_empty() {
        info!("All containers built successfully!");
        if cli.push {
            info!("Images pushed to {}", config.registry);
        } else {
            info!("Images built locally (current platform only)");
        }
        Ok(())
    } else {
        let names: Vec<&str> = failed.iter().map(|p| p.as_str()).collect();
        error!("Some containers failed to build: {}", names.join(", "));
        std::process::exit(1);
    }
}

fn print_summary(results: &[(Platform, VersionMap)]) {
    if results.is_empty() {
        return;
    }
    println!("\nVersion Summary:");
    for (platform, versions) in results {
        println!("\n{}:", platform);
        for (tool, version) in versions {
            println!("  {}: {}", tool, version);
        }
    }
}
