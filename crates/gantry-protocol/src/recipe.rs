//! Direct protocol placement recipes.
//!
//! The direct backend stores complete placement specifications rather
//! than accepting verb-shaped messages, so these builders produce the
//! full recipe in one shot: a one-off staging task or a desired
//! long-running process. The legacy path never sees these shapes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use gantry_core::{BuildpackStaging, DispatchConfig, ProcessRecord};

use crate::identity::ProcessIdentity;
use crate::translate::{BuildpackEntry, DesireEnvelope, HealthCheckPayload};

/// Domain tag for staging tasks in the direct backend.
pub const STAGING_DOMAIN: &str = "gantry-staging";
/// Domain tag for long-running processes in the direct backend.
pub const APPS_DOMAIN: &str = "gantry-apps";

/// Log source label attached to staging task output.
const STAGING_LOG_SOURCE: &str = "STG";
/// Log source label attached to app instance output.
const APP_LOG_SOURCE: &str = "APP";

// ── Specs ─────────────────────────────────────────────────────────

/// Complete staging task for the direct backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StagingTaskSpec {
    /// Addressing key, carried in-band so the backend can store the task.
    pub staging_key: String,
    pub domain: String,
    /// Preloaded root filesystem derived from the buildpack stack.
    pub root_fs: String,
    pub memory_mb: u32,
    pub disk_mb: u32,
    pub environment: BTreeMap<String, String>,
    pub package_download_uri: String,
    pub droplet_upload_uri: String,
    pub buildpacks: Vec<BuildpackEntry>,
    pub timeout_secs: u64,
    pub completion_callback: Option<String>,
    pub log_source: String,
    pub placement_tags: Vec<String>,
}

/// Complete desired long-running-process spec for the direct backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DesiredPlacementSpec {
    /// Addressing key, carried in-band so the backend can store the spec.
    pub process_key: String,
    pub domain: String,
    pub root_fs: String,
    pub instances: u32,
    pub memory_mb: u32,
    pub disk_mb: u32,
    pub file_descriptors: u32,
    pub start_command: String,
    pub execution_metadata: String,
    pub droplet_uri: String,
    pub droplet_hash: String,
    pub environment: BTreeMap<String, String>,
    pub ports: Vec<u16>,
    pub routes: Vec<String>,
    pub health_check: HealthCheckPayload,
    pub log_guid: String,
    pub log_source: String,
    pub placement_tags: Vec<String>,
    /// Drift marker; rotates with the process version.
    pub annotation: String,
}

/// The mutable subset the direct backend's update verb accepts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacementUpdate {
    pub instances: u32,
    pub routes: Vec<String>,
    pub annotation: String,
}

impl From<&DesiredPlacementSpec> for PlacementUpdate {
    fn from(spec: &DesiredPlacementSpec) -> Self {
        Self {
            instances: spec.instances,
            routes: spec.routes.clone(),
            annotation: spec.annotation.clone(),
        }
    }
}

// ── Builder ───────────────────────────────────────────────────────

/// Builds direct-backend specs from a fixed dispatch context.
///
/// Constructed once per dispatch with the config, the process, and
/// its desire envelope; every output is a deterministic function of
/// that context.
pub struct RecipeBuilder<'a> {
    config: &'a DispatchConfig,
    process: &'a ProcessRecord,
    envelope: &'a DesireEnvelope,
}

impl<'a> RecipeBuilder<'a> {
    pub fn new(
        config: &'a DispatchConfig,
        process: &'a ProcessRecord,
        envelope: &'a DesireEnvelope,
    ) -> Self {
        Self {
            config,
            process,
            envelope,
        }
    }

    /// Build the desired long-running-process spec.
    pub fn build_run_spec(&self) -> DesiredPlacementSpec {
        let request = &self.envelope.request;
        // The legacy service applies its own descriptor default
        // server-side; the direct backend stores the spec verbatim, so
        // a zero limit must be resolved here.
        let file_descriptors = if request.file_descriptors == 0 {
            self.config.instance_file_descriptor_limit
        } else {
            request.file_descriptors
        };
        let spec = DesiredPlacementSpec {
            process_key: request.process_key.clone(),
            domain: APPS_DOMAIN.to_string(),
            root_fs: preloaded_root_fs(&request.stack),
            instances: request.instances,
            memory_mb: request.memory_mb,
            disk_mb: request.disk_mb,
            file_descriptors,
            start_command: request.start_command.clone(),
            execution_metadata: self.envelope.execution_metadata.clone(),
            droplet_uri: request.droplet_uri.clone(),
            droplet_hash: request.droplet_hash.clone(),
            environment: request.environment.clone(),
            ports: self.envelope.ports.clone(),
            routes: request.routes.clone(),
            health_check: request.health_check.clone(),
            log_guid: request.log_guid.clone(),
            log_source: APP_LOG_SOURCE.to_string(),
            placement_tags: placement_tags(self.process.isolation_segment.as_deref()),
            annotation: self.process.version.clone(),
        };
        debug!(
            key = %spec.process_key,
            instances = spec.instances,
            "built run spec"
        );
        spec
    }

    /// Build the staging task for a buildpack staging attempt.
    ///
    /// Context-free: staging has no desire envelope. Docker staging
    /// never reaches this path; the router sends it to the legacy
    /// backend instead.
    pub fn build_staging_task(
        config: &DispatchConfig,
        staging: BuildpackStaging<'_>,
    ) -> StagingTaskSpec {
        let details = staging.details;
        let task = StagingTaskSpec {
            staging_key: ProcessIdentity::for_staging(details).to_string(),
            domain: STAGING_DOMAIN.to_string(),
            root_fs: preloaded_root_fs(staging.stack),
            memory_mb: details.staging_memory_mb,
            disk_mb: details.staging_disk_mb,
            environment: details.environment.clone(),
            package_download_uri: details.package.download_uri.clone(),
            droplet_upload_uri: details.droplet.upload_uri.clone(),
            buildpacks: staging.buildpacks.iter().map(BuildpackEntry::from).collect(),
            timeout_secs: config.staging_timeout_secs,
            completion_callback: config.staging_completion_callback.clone(),
            log_source: STAGING_LOG_SOURCE.to_string(),
            placement_tags: placement_tags(details.isolation_segment.as_deref()),
        };
        debug!(key = %task.staging_key, "built staging task");
        task
    }
}

/// Root filesystem URI for a preloaded stack.
fn preloaded_root_fs(stack: &str) -> String {
    format!("preloaded:{stack}")
}

/// Placement tags for an optional isolation segment.
fn placement_tags(segment: Option<&str>) -> Vec<String> {
    segment.map(|s| vec![s.to_string()]).unwrap_or_default()
}
