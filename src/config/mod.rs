use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::arch;


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Registry root for published images; the platform name is appended
    /// as `<registry>-<platform>`
    #[serde(default = "default_registry")]
    pub registry: String,

    /// Local-only image name used for probe tags (never registry-prefixed)
    #[serde(default = "default_local_name")]
    pub local_name: String,

    /// Architectures targeted by pushed multi-arch builds
    #[serde(default = "default_architectures")]
    pub architectures: Vec<String>,

    /// Value of the provenance source label
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// Dotted namespace for per-tool version labels
    #[serde(default = "default_label_namespace")]
    pub label_namespace: String,

    /// Directory holding one build context subdirectory per platform
    #[serde(default = "default_containers_dir")]
    pub containers_dir: PathBuf,

    /// Name of the buildx builder instance created on demand
    #[serde(default = "default_builder_name")]
    pub builder_name: String,

    /// Helper script patched by --pin-pull-platform
    #[serde(default = "default_pull_script")]
    pub pull_script: PathBuf,
}

fn default_registry() -> String {
    "ghcr.io/profbox/profbox".to_string()
}

fn default_local_name() -> String {
    "profbox".to_string()
}

fn default_architectures() -> Vec<String> {
    vec![arch::LINUX_AMD64.to_string(), arch::LINUX_ARM64.to_string()]
}

fn default_source_url() -> String {
    "https://github.com/profbox/profbox".to_string()
}

fn default_label_namespace() -> String {
    "io.profbox".to_string()
}

fn default_containers_dir() -> PathBuf {
    PathBuf::from("containers")
}

fn default_builder_name() -> String {
    "profbox-builder".to_string()
}

fn default_pull_script() -> PathBuf {
    PathBuf::from("scripts/docker-pull.sh")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: default_registry(),
            local_name: default_local_name(),
            architectures: default_architectures(),
            source_url: default_source_url(),
            label_namespace: default_label_namespace(),
            containers_dir: default_containers_dir(),
            builder_name: default_builder_name(),
            pull_script: default_pull_script(),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("profbox").join("config.toml");
            if config_path.exists() {
                let content = std::fs::read_to_string(config_path)?;
                let config: Config = toml::from_str(&content)?;
                return Ok(config);
            }
        }
        Ok(Config::default())
    }
}
