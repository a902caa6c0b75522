/// Target architecture constants for container images
pub mod arch {
    /// Linux AMD64 platform identifier
    pub const LINUX_AMD64: &str = "linux/amd64";

    /// Linux ARM64 platform identifier
    pub const LINUX_ARM64: &str = "linux/arm64";
}

/// Container image tag constants
pub mod tag {
    /// Default container image tag
    pub const DEFAULT: &str = "latest";
}

/// OCI label keys attached to published images
pub mod label {
    /// Provenance source label key
    pub const SOURCE: &str = "org.opencontainers.image.source";

    /// Human-readable description label key
    pub const DESCRIPTION: &str = "org.opencontainers.image.description";
}
