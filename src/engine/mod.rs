// Container engine access: one typed trait, one CLI adapter

pub mod cli;
pub mod inspect;

pub use cli::CliEngine;

use crate::errors::{NctError, Result};
use std::path::Path;

/// Supported engine binaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Podman,
    Docker,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Podman => "podman",
            EngineKind::Docker => "docker",
        }
    }

    /// Find an installed engine, podman first
    pub fn detect() -> Result<Self> {
        [EngineKind::Podman, EngineKind::Docker]
            .into_iter()
            .find(|kind| which::which(kind.as_str()).is_ok())
            .ok_or_else(|| {
                NctError::Engine("Neither podman nor docker was found in PATH".to_string())
            })
    }
}

impl std::str::FromStr for EngineKind {
    type Err = NctError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "podman" => Ok(EngineKind::Podman),
            "docker" => Ok(EngineKind::Docker),
            other => Err(NctError::Config(format!(
                "Unknown container engine '{}'. Expected podman or docker",
                other
            ))),
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the orchestrator needs from a container engine.
///
/// Implementations report engine failures as errors; turning those into
/// boolean results is the orchestrator's job.
pub trait ContainerEngine {
    fn kind(&self) -> EngineKind;

    /// Build `tag` from a Dockerfile
    fn build(&self, dockerfile: &Path, context: &Path, tag: &str, args: &[String]) -> Result<()>;

    /// Layer application source onto `base_image` with s2i, producing `dest_image`
    fn s2i_build(
        &self,
        app_path: &Path,
        base_image: &str,
        dest_image: &str,
        args: &[String],
    ) -> Result<()>;

    /// Start a detached container, writing its id to `cid_file`
    fn run(&self, image: &str, cid_file: &Path, args: &[String]) -> Result<()>;

    /// Run a throw-away container and return its stdout.
    /// Without a command the image's default command runs.
    fn run_rm(&self, image: &str, command: Option<&str>) -> Result<String>;

    /// Address of a running container
    fn inspect_ip(&self, container_id: &str) -> Result<String>;

    /// Combined stdout and stderr the container has logged so far
    fn logs(&self, container_id: &str) -> Result<String>;

    /// Run a bash command inside a running container and return stdout
    fn exec(&self, container_id: &str, command: &str) -> Result<String>;

    fn remove_container(&self, container_id: &str) -> Result<()>;

    fn remove_image(&self, image: &str) -> Result<()>;

    fn image_exists(&self, image: &str) -> bool;
}
