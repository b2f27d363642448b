//! Dispatch configuration.
//!
//! Backend-selection flags and scheduler tunables, loaded from TOML at
//! process start and read-only afterwards. The flags are plain booleans
//! with explicit defaults rather than optional fields: an absent flag
//! means "legacy", never "undecided".

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Runtime configuration consulted by the dispatcher on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Route buildpack staging to the direct backend.
    #[serde(default)]
    pub use_direct_staging: bool,
    /// Route run and stop-process to the direct backend.
    #[serde(default)]
    pub use_direct_apps: bool,
    /// Health-check timeout applied when a process carries no override.
    #[serde(default = "default_health_check_timeout_secs")]
    pub default_health_check_timeout_secs: u64,
    /// Wall-clock limit for a single staging task.
    #[serde(default = "default_staging_timeout_secs")]
    pub staging_timeout_secs: u64,
    /// File descriptor limit handed to staging containers.
    #[serde(default = "default_file_descriptor_limit")]
    pub instance_file_descriptor_limit: u32,
    /// URL the staging backend reports completion to, if any.
    #[serde(default)]
    pub staging_completion_callback: Option<String>,
}

fn default_health_check_timeout_secs() -> u64 {
    60
}

fn default_staging_timeout_secs() -> u64 {
    900
}

fn default_file_descriptor_limit() -> u32 {
    16_384
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            use_direct_staging: false,
            use_direct_apps: false,
            default_health_check_timeout_secs: default_health_check_timeout_secs(),
            staging_timeout_secs: default_staging_timeout_secs(),
            instance_file_descriptor_limit: default_file_descriptor_limit(),
            staging_completion_callback: None,
        }
    }
}

impl DispatchConfig {
    /// Load dispatch configuration from a TOML file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DispatchConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Health-check timeout applied when a process has no override.
    pub fn default_health_check_timeout(&self) -> Duration {
        Duration::from_secs(self.default_health_check_timeout_secs)
    }

    /// Wall-clock limit for a single staging task.
    pub fn staging_timeout(&self) -> Duration {
        Duration::from_secs(self.staging_timeout_secs)
    }
}
