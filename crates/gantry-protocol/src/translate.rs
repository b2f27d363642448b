//! Legacy protocol translation.
//!
//! Pure functions that turn domain records into the wire messages the
//! legacy stage and run services accept. The fuller `DesireEnvelope`
//! is built here too: the direct path needs more than the legacy wire
//! shape, so it widens the desire message rather than redefining it.
//!
//! None of these functions perform I/O or mutate their inputs; where a
//! message goes is the dispatcher's decision.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use gantry_core::{
    BuildpackRef, DispatchConfig, HealthCheckKind, Lifecycle, ProcessRecord, StagingDetails,
};

use crate::identity::ProcessIdentity;

// ── Messages ──────────────────────────────────────────────────────

/// Staging request for the legacy stage service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageRequest {
    /// Guid of the application the package belongs to.
    pub app_guid: String,
    pub memory_mb: u32,
    pub disk_mb: u32,
    pub file_descriptors: u32,
    pub timeout_secs: u64,
    pub environment: BTreeMap<String, String>,
    pub completion_callback: Option<String>,
    pub lifecycle: LifecyclePayload,
    pub isolation_segment: Option<String>,
}

/// Lifecycle section of a staging request.
///
/// The legacy path serves both lifecycle families; the buildpack
/// variant carries the blobstore URIs the staging container needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecyclePayload {
    Buildpack {
        stack: String,
        buildpacks: Vec<BuildpackEntry>,
        package_download_uri: String,
        droplet_upload_uri: String,
    },
    Docker {
        image: String,
    },
}

/// One buildpack entry in a staging payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildpackEntry {
    pub name: String,
    pub url: String,
    pub skip_detect: bool,
}

impl From<&BuildpackRef> for BuildpackEntry {
    fn from(buildpack: &BuildpackRef) -> Self {
        Self {
            name: buildpack.name.clone(),
            url: buildpack.url.clone(),
            skip_detect: buildpack.skip_detect,
        }
    }
}

/// Desire message for the legacy run service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DesireRequest {
    /// Addressing key, carried in-band as the legacy service expects.
    pub process_key: String,
    /// Log correlation guid; stable across version rotations.
    pub log_guid: String,
    pub droplet_uri: String,
    pub droplet_hash: String,
    pub start_command: String,
    pub stack: String,
    pub instances: u32,
    pub memory_mb: u32,
    pub disk_mb: u32,
    pub file_descriptors: u32,
    pub environment: BTreeMap<String, String>,
    pub routes: Vec<String>,
    pub health_check: HealthCheckPayload,
}

/// Health check section of a desire message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthCheckPayload {
    pub kind: HealthCheckKind,
    /// Resolved timeout: the per-process override or the config default.
    pub timeout_secs: u64,
}

/// Fuller desire shape consumed by the direct path's recipe builder.
///
/// Extends the legacy message with the fields only the direct backend
/// uses. Never sent to the legacy service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DesireEnvelope {
    pub request: DesireRequest,
    pub ports: Vec<u16>,
    pub execution_metadata: String,
}

// ── Translators ───────────────────────────────────────────────────

/// Build the staging message for the legacy stage service.
pub fn stage_request(config: &DispatchConfig, details: &StagingDetails) -> StageRequest {
    StageRequest {
        app_guid: details.package.app_guid.clone(),
        memory_mb: details.staging_memory_mb,
        disk_mb: details.staging_disk_mb,
        file_descriptors: config.instance_file_descriptor_limit,
        timeout_secs: config.staging_timeout_secs,
        environment: details.environment.clone(),
        completion_callback: config.staging_completion_callback.clone(),
        lifecycle: lifecycle_payload(details),
        isolation_segment: details.isolation_segment.clone(),
    }
}

/// Build the desire message for the legacy run service.
pub fn desire_request(
    process: &ProcessRecord,
    default_health_check_timeout: Duration,
) -> DesireRequest {
    DesireRequest {
        process_key: ProcessIdentity::from_process(process).to_string(),
        log_guid: process.guid.clone(),
        droplet_uri: process.droplet_uri.clone(),
        droplet_hash: process.droplet_hash.clone(),
        start_command: process.start_command.clone(),
        stack: process.stack.clone(),
        instances: process.instances,
        memory_mb: process.memory_mb,
        disk_mb: process.disk_mb,
        file_descriptors: process.file_descriptors,
        environment: process.environment.clone(),
        routes: process.routes.clone(),
        health_check: HealthCheckPayload {
            kind: process.health_check.kind.clone(),
            timeout_secs: process
                .health_check
                .resolved_timeout_secs(default_health_check_timeout),
        },
    }
}

/// Build the fuller desire envelope for the direct path.
pub fn desire_envelope(
    process: &ProcessRecord,
    default_health_check_timeout: Duration,
) -> DesireEnvelope {
    DesireEnvelope {
        request: desire_request(process, default_health_check_timeout),
        ports: process.ports.clone(),
        execution_metadata: process.execution_metadata.clone(),
    }
}

fn lifecycle_payload(details: &StagingDetails) -> LifecyclePayload {
    match &details.lifecycle {
        Lifecycle::Buildpack { stack, buildpacks } => LifecyclePayload::Buildpack {
            stack: stack.clone(),
            buildpacks: buildpacks.iter().map(BuildpackEntry::from).collect(),
            package_download_uri: details.package.download_uri.clone(),
            droplet_upload_uri: details.droplet.upload_uri.clone(),
        },
        Lifecycle::Docker { image } => LifecyclePayload::Docker {
            image: image.clone(),
        },
    }
}
