use crate::errors::{NctError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variables every suite needs before any test runs
pub const REQUIRED_VARIABLES: [&str; 3] = ["IMAGE_NAME", "VERSION", "TARGET"];

/// Environment variable naming an optional settings file
pub const SETTINGS_ENV: &str = "NCT_CONFIG";

/// Image under test, read once from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestConfig {
    pub image_name: String,
    pub version: String,
    pub target: String,
}

impl TestConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| -> Result<String> {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| NctError::MissingVariable(name.to_string()))
        };

        Ok(Self {
            image_name: get("IMAGE_NAME")?,
            version: get("VERSION")?,
            target: get("TARGET")?,
        })
    }

    /// Split IMAGE_NAME into repository and tag.
    /// A colon before the last '/' belongs to a registry port, not a tag.
    fn split_image(&self) -> (&str, Option<&str>) {
        let name_start = self.image_name.rfind('/').map(|i| i + 1).unwrap_or(0);
        match self.image_name[name_start..].rfind(':') {
            Some(i) => {
                let split = name_start + i;
                (&self.image_name[..split], Some(&self.image_name[split + 1..]))
            }
            None => (self.image_name.as_str(), None),
        }
    }

    /// Image name without its tag
    pub fn image_repository(&self) -> &str {
        self.split_image().0
    }

    /// Image tag, `latest` when IMAGE_NAME carries none
    pub fn image_tag(&self) -> &str {
        self.split_image().1.unwrap_or("latest")
    }

    /// Version to pin in example Dockerfiles (micro variants share the full version)
    pub fn dockerfile_version(&self) -> &str {
        self.version
            .strip_suffix("-micro")
            .unwrap_or(&self.version)
    }

    /// Destination name for an application image built on top of IMAGE_NAME
    pub fn app_image_name(&self, app_name: &str) -> String {
        format!("{}-{}", self.image_name, app_name)
    }
}

/// Harness tuning, optionally loaded from the file named by NCT_CONFIG
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// "podman" or "docker"; auto-detected when unset
    pub engine: Option<String>,
    pub s2i: String,
    pub wait_timeout: String,
    pub poll_interval_ms: u64,
    pub probe_timeout: String,
    pub default_port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: None,
            s2i: "s2i".to_string(),
            wait_timeout: "30s".to_string(),
            poll_interval_ms: 500,
            probe_timeout: "10s".to_string(),
            default_port: 8080,
        }
    }
}

impl Settings {
    /// Load settings from the file named by NCT_CONFIG, or defaults
    pub fn from_env() -> Result<Self> {
        match std::env::var(SETTINGS_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load(Path::new(path.trim())),
            _ => Ok(Self::default()),
        }
    }

    /// Load settings from a YAML file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_yml::from_str(&content)
            .map_err(|e| NctError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        // Surface bad durations at load time rather than mid-test
        settings.wait_timeout()?;
        settings.probe_timeout()?;

        Ok(settings)
    }

    pub fn wait_timeout(&self) -> Result<Duration> {
        parse_duration(&self.wait_timeout)
    }

    pub fn probe_timeout(&self) -> Result<Duration> {
        parse_duration(&self.probe_timeout)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Parse a duration string ("30s", "1m", or bare seconds)
pub fn parse_duration(value: &str) -> Result<Duration> {
    let value = value.trim();
    let invalid = || NctError::Config(format!("Invalid duration value: {}", value));

    let seconds = if let Some(num) = value.strip_suffix('s') {
        num.trim().parse::<u64>().map_err(|_| invalid())?
    } else if let Some(num) = value.strip_suffix('m') {
        num.trim()
            .parse::<u64>()
            .map_err(|_| invalid())?
            .checked_mul(60)
            .ok_or_else(invalid)?
    } else {
        value.parse::<u64>().map_err(|_| invalid())?
    };

    Ok(Duration::from_secs(seconds))
}
