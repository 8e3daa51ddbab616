use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NctError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Required environment variable {0} is missing. IMAGE_NAME, VERSION and TARGET must all be set.")]
    MissingVariable(String),

    #[error("Dockerfile not found: {}", .0.display())]
    DockerfileNotFound(PathBuf),

    #[error("Build failed: {0}")]
    Build(String),

    #[error("Run failed: {0}")]
    Run(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Lookup failed: {0}")]
    Lookup(String),

    #[error("Container engine error: {0}")]
    Engine(String),

    #[error("Probe failed: {0}")]
    Probe(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NctError>;
