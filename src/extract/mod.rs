//! Version extraction from a freshly built probe image.
//!
//! Runs each catalog probe inside the image on the host architecture and
//! normalizes the output. A failing probe leaves its tool absent from the
//! map; extraction itself never fails.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::catalog::{Platform, ProbeOutput};
use crate::docker;
use crate::executor;

/// Tool name -> normalized version. Partial: tools whose probe failed are
/// simply absent. Ordered so derived labels are deterministic.
pub type VersionMap = BTreeMap<String, String>;

pub fn extract_versions(platform: Platform, probe_tag: &str) -> VersionMap {
    let mut versions = VersionMap::new();

    for probe in platform.probes() {
        let mut args: Vec<&str> = vec![
            "docker",
            "run",
            "--rm",
            "--platform",
            docker::host_platform(),
            probe_tag,
        ];
        args.extend_from_slice(probe.command);

        match executor::run(&args) {
            Ok(out) if out.success() => {
                let raw = ProbeOutput {
                    stdout: out.stdout,
                    stderr: out.stderr,
                };
                if let Some(version) = (probe.parse)(&raw) {
                    versions.insert(probe.tool.to_string(), version);
                }
            }
            Ok(out) => {
                debug!(
                    "Probe for {} exited with status {}; skipping",
                    probe.tool, out.code
                );
            }
            Err(e) => {
                warn!("Could not get version for {}: {:#}", probe.tool, e);
            }
        }
    }

    versions
}
