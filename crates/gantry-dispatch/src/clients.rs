//! Backend client contracts.
//!
//! The dispatcher talks to four RPC stubs: the legacy stage and run
//! services, and the direct backend's stage and run surfaces. The
//! traits carry only the verbs the dispatcher uses; connection
//! lifecycle and wire formats belong to the implementations, which the
//! host injects at construction time.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gantry_protocol::identity::ProcessIdentity;
use gantry_protocol::recipe::{DesiredPlacementSpec, PlacementUpdate, StagingTaskSpec};
use gantry_protocol::translate::{DesireRequest, StageRequest};

/// Result type alias for backend client calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Failures reported by backend client implementations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend rejected request: {0}")]
    Rejected(String),

    #[error("invalid backend response: {0}")]
    InvalidResponse(String),
}

/// The direct backend's view of an existing placement.
///
/// Only the fields reconciliation reads; the backend holds the full
/// spec.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacementSummary {
    pub instances: u32,
    /// Drift marker recorded at the last create or update.
    pub annotation: String,
}

/// Legacy staging service.
#[async_trait]
pub trait LegacyStageClient: Send + Sync {
    /// Submit a staging request under the given key.
    async fn stage(&self, key: &ProcessIdentity, request: &StageRequest) -> ClientResult<()>;

    /// Cancel an in-flight staging attempt.
    async fn stop_staging(&self, key: &ProcessIdentity) -> ClientResult<()>;
}

/// Legacy run service.
#[async_trait]
pub trait LegacyRunClient: Send + Sync {
    /// Submit a desire message under the given key.
    async fn desire(&self, key: &ProcessIdentity, request: &DesireRequest) -> ClientResult<()>;

    /// Stop a single instance by zero-based index.
    async fn stop_index(&self, key: &ProcessIdentity, index: u32) -> ClientResult<()>;

    /// Stop every instance of the process.
    async fn stop(&self, key: &ProcessIdentity) -> ClientResult<()>;
}

/// Direct backend, staging surface.
#[async_trait]
pub trait DirectStageClient: Send + Sync {
    /// Submit a complete staging task under the given key.
    async fn stage(&self, key: &ProcessIdentity, task: &StagingTaskSpec) -> ClientResult<()>;
}

/// Direct backend, run surface.
///
/// The backend exposes no discrete desire verb; callers probe for an
/// existing placement and then create or update (see
/// [`crate::reconcile`]).
#[async_trait]
pub trait DirectRunClient: Send + Sync {
    /// Fetch the existing placement for a key, if the backend has one.
    async fn fetch_placement(
        &self,
        key: &ProcessIdentity,
    ) -> ClientResult<Option<PlacementSummary>>;

    /// Store a new placement spec.
    async fn create_placement(&self, spec: &DesiredPlacementSpec) -> ClientResult<()>;

    /// Apply the mutable subset to an existing placement.
    async fn update_placement(
        &self,
        key: &ProcessIdentity,
        update: &PlacementUpdate,
    ) -> ClientResult<()>;

    /// Stop every instance of the process.
    async fn stop(&self, key: &ProcessIdentity) -> ClientResult<()>;
}
