//! Dispatcher — projects lifecycle intents onto a scheduler backend.
//!
//! The `Dispatcher` is the façade the rest of the control plane calls:
//! - Derives the addressing identity before every backend call
//! - Routes each lifecycle verb to the legacy or direct backend per
//!   runtime configuration
//! - Builds the payload for the chosen backend and submits it
//!
//! It holds references to its four backend clients and nothing else;
//! configuration arrives by parameter on every call and is never
//! cached. One backend submission per invocation, no retries, errors
//! propagated with operation and identity context.

use std::sync::Arc;

use tracing::{debug, info};

use gantry_core::{DispatchConfig, ProcessRecord, StagingDetails};
use gantry_protocol::identity::ProcessIdentity;
use gantry_protocol::recipe::RecipeBuilder;
use gantry_protocol::translate::{desire_envelope, desire_request, stage_request};

use crate::clients::{
    ClientError, DirectRunClient, DirectStageClient, LegacyRunClient, LegacyStageClient,
};
use crate::error::{DispatchError, DispatchResult};
use crate::reconcile;
use crate::routing::{BackendChoice, DispatchIntent, choose_backend};

/// The lifecycle dispatcher.
///
/// Clients are injected at construction and shared; the dispatcher
/// never assumes exclusive access to them and holds no mutable state.
pub struct Dispatcher {
    legacy_stage: Arc<dyn LegacyStageClient>,
    legacy_run: Arc<dyn LegacyRunClient>,
    direct_stage: Arc<dyn DirectStageClient>,
    direct_run: Arc<dyn DirectRunClient>,
}

impl Dispatcher {
    pub fn new(
        legacy_stage: Arc<dyn LegacyStageClient>,
        legacy_run: Arc<dyn LegacyRunClient>,
        direct_stage: Arc<dyn DirectStageClient>,
        direct_run: Arc<dyn DirectRunClient>,
    ) -> Self {
        Self {
            legacy_stage,
            legacy_run,
            direct_stage,
            direct_run,
        }
    }

    /// Submit a staging request for the given details.
    ///
    /// Buildpack staging goes to the direct backend when
    /// `use_direct_staging` is set; every other combination stays on
    /// the legacy path.
    pub async fn request_staging(
        &self,
        config: &DispatchConfig,
        details: &StagingDetails,
    ) -> DispatchResult<()> {
        let key = ProcessIdentity::for_staging(details);
        let intent = DispatchIntent::Stage {
            lifecycle: details.lifecycle.kind(),
        };
        let backend = choose_backend(intent, config);
        debug!(%key, %backend, "routing staging request");

        match backend {
            BackendChoice::Legacy => {
                let request = stage_request(config, details);
                self.legacy_stage
                    .stage(&key, &request)
                    .await
                    .map_err(wrap("request_staging", &key))?;
            }
            BackendChoice::Direct => {
                // Routing only picks the direct path for buildpack
                // lifecycles, so the buildpack view always exists here.
                let staging = details
                    .as_buildpack()
                    .ok_or_else(|| precondition("request_staging", &key))?;
                let task = RecipeBuilder::build_staging_task(config, staging);
                self.direct_stage
                    .stage(&key, &task)
                    .await
                    .map_err(wrap("request_staging", &key))?;
            }
        }
        info!(%key, %backend, "staging requested");
        Ok(())
    }

    /// Cancel an in-flight staging attempt.
    ///
    /// Always legacy; the direct backend exposes no cancel verb.
    pub async fn cancel_staging(&self, key: &ProcessIdentity) -> DispatchResult<()> {
        self.legacy_stage
            .stop_staging(key)
            .await
            .map_err(wrap("cancel_staging", key))?;
        info!(%key, "staging cancelled");
        Ok(())
    }

    /// Submit the desired run state for a process.
    ///
    /// On the direct path this is the one reconciling operation: build
    /// the full placement spec, then create-or-update it at the
    /// backend.
    pub async fn request_run(
        &self,
        process: &ProcessRecord,
        config: &DispatchConfig,
    ) -> DispatchResult<()> {
        let key = ProcessIdentity::from_process(process);
        let backend = choose_backend(DispatchIntent::Run, config);
        debug!(%key, %backend, instances = process.instances, "routing run request");

        match backend {
            BackendChoice::Legacy => {
                let request = desire_request(process, config.default_health_check_timeout());
                self.legacy_run
                    .desire(&key, &request)
                    .await
                    .map_err(wrap("request_run", &key))?;
            }
            BackendChoice::Direct => {
                let envelope = desire_envelope(process, config.default_health_check_timeout());
                let spec = RecipeBuilder::new(config, process, &envelope).build_run_spec();
                reconcile::create_or_update(&key, &spec, self.direct_run.as_ref())
                    .await
                    .map_err(wrap("request_run", &key))?;
            }
        }
        info!(%key, %backend, "run requested");
        Ok(())
    }

    /// Stop a single instance of a process by zero-based index.
    ///
    /// Always legacy; the direct backend has no per-index stop.
    pub async fn stop_instance(&self, process: &ProcessRecord, index: u32) -> DispatchResult<()> {
        let key = ProcessIdentity::from_process(process);
        self.legacy_run
            .stop_index(&key, index)
            .await
            .map_err(wrap("stop_instance", &key))?;
        info!(%key, index, "instance stop requested");
        Ok(())
    }

    /// Stop every instance of a process.
    pub async fn stop_process(
        &self,
        process: &ProcessRecord,
        config: &DispatchConfig,
    ) -> DispatchResult<()> {
        let key = ProcessIdentity::from_process(process);
        let backend = choose_backend(DispatchIntent::StopProcess, config);
        debug!(%key, %backend, "routing stop request");

        match backend {
            BackendChoice::Legacy => self.legacy_run.stop(&key).await,
            BackendChoice::Direct => self.direct_run.stop(&key).await,
        }
        .map_err(wrap("stop_process", &key))?;
        info!(%key, %backend, "process stop requested");
        Ok(())
    }
}

/// Wrap a client error with the failing operation and its key.
fn wrap(
    operation: &'static str,
    key: &ProcessIdentity,
) -> impl FnOnce(ClientError) -> DispatchError {
    let key = key.to_string();
    move |source| DispatchError::Backend {
        operation,
        key,
        source,
    }
}

/// Unreachable under the routing policy; kept as a checked error
/// rather than a panic so a policy regression surfaces cleanly.
fn precondition(operation: &'static str, key: &ProcessIdentity) -> DispatchError {
    DispatchError::Precondition {
        operation,
        key: key.to_string(),
        reason: "direct staging requires a buildpack lifecycle",
    }
}
