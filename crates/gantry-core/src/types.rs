//! Domain types consumed by the dispatch layer.
//!
//! These records are produced by the host platform (persistence,
//! manifest handling, staging orchestration) and arrive here already
//! validated. All types are serializable so payload builders can embed
//! them in scheduler messages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

// ── Process ───────────────────────────────────────────────────────

/// A persisted application process, as supplied by the host system.
///
/// `guid` is unique per process and `version` rotates whenever the
/// process spec changes; together they form the scheduler addressing
/// key. The remaining fields feed the desire/placement payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessRecord {
    pub guid: String,
    /// Version marker, rotated on every spec change.
    pub version: String,
    /// Display name of the owning application.
    pub app_name: String,
    pub start_command: String,
    /// Metadata emitted by the staging step (detected start command etc.).
    pub execution_metadata: String,
    pub instances: u32,
    pub memory_mb: u32,
    pub disk_mb: u32,
    pub file_descriptors: u32,
    /// Root filesystem stack the droplet was staged against.
    pub stack: String,
    pub droplet_uri: String,
    pub droplet_hash: String,
    pub environment: BTreeMap<String, String>,
    pub routes: Vec<String>,
    pub ports: Vec<u16>,
    pub health_check: HealthCheck,
    /// Placement isolation segment, if the process is pinned to one.
    pub isolation_segment: Option<String>,
}

/// Health check configuration for a process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthCheck {
    pub kind: HealthCheckKind,
    /// Per-process override of the configured default timeout.
    pub timeout_secs: Option<u64>,
}

/// How the scheduler probes a running instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HealthCheckKind {
    Port,
    Process,
    Http { endpoint: String },
}

// ── Staging ───────────────────────────────────────────────────────

/// Reference to a package awaiting staging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageRef {
    pub guid: String,
    /// Guid of the application that owns the package.
    pub app_guid: String,
    pub download_uri: String,
}

/// Reference to the droplet a staging attempt will produce.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DropletRef {
    pub guid: String,
    pub upload_uri: String,
}

/// Lifecycle strategy for building and running an application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Lifecycle {
    Buildpack {
        stack: String,
        buildpacks: Vec<BuildpackRef>,
    },
    Docker {
        image: String,
    },
}

/// One buildpack in a buildpack lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildpackRef {
    pub name: String,
    pub url: String,
    /// Skip the detect phase and run this buildpack unconditionally.
    pub skip_detect: bool,
}

/// Lifecycle family, without the per-family payload. Used by routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleKind {
    Buildpack,
    Docker,
}

/// Immutable bundle describing one staging attempt.
///
/// Constructed by the caller per attempt and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StagingDetails {
    pub package: PackageRef,
    pub droplet: DropletRef,
    pub lifecycle: Lifecycle,
    pub environment: BTreeMap<String, String>,
    pub staging_memory_mb: u32,
    pub staging_disk_mb: u32,
    pub isolation_segment: Option<String>,
}

/// Borrowed buildpack view of a staging attempt.
///
/// Exists only for buildpack lifecycles; the direct staging path takes
/// this instead of raw details, so docker staging can never reach it.
#[derive(Debug, Clone, Copy)]
pub struct BuildpackStaging<'a> {
    pub details: &'a StagingDetails,
    pub stack: &'a str,
    pub buildpacks: &'a [BuildpackRef],
}

impl Lifecycle {
    /// The lifecycle family, used by backend routing.
    pub fn kind(&self) -> LifecycleKind {
        match self {
            Lifecycle::Buildpack { .. } => LifecycleKind::Buildpack,
            Lifecycle::Docker { .. } => LifecycleKind::Docker,
        }
    }
}

impl StagingDetails {
    /// Buildpack view of this attempt, or `None` for other lifecycles.
    pub fn as_buildpack(&self) -> Option<BuildpackStaging<'_>> {
        match &self.lifecycle {
            Lifecycle::Buildpack { stack, buildpacks } => Some(BuildpackStaging {
                details: self,
                stack,
                buildpacks,
            }),
            Lifecycle::Docker { .. } => None,
        }
    }
}

impl HealthCheck {
    /// Timeout for this check, falling back to the supplied default.
    pub fn resolved_timeout_secs(&self, default: Duration) -> u64 {
        self.timeout_secs.unwrap_or(default.as_secs())
    }
}
