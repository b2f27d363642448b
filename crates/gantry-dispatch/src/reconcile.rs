//! Create-or-update reconciliation against the direct backend.
//!
//! The direct backend exposes no desire verb distinct from update, so
//! convergence is a probe followed by either a create or an update of
//! the mutable subset. Whether reconciliation runs at all is the
//! routing policy's decision; this module is unconditionally
//! idempotent and performs no retries.

use tracing::debug;

use gantry_protocol::identity::ProcessIdentity;
use gantry_protocol::recipe::{DesiredPlacementSpec, PlacementUpdate};

use crate::clients::{ClientResult, DirectRunClient};

/// Converge the backend's placement for `key` to `spec`.
///
/// A probe failure is a backend failure and propagates as-is; it is
/// never treated as "no placement exists".
pub async fn create_or_update(
    key: &ProcessIdentity,
    spec: &DesiredPlacementSpec,
    client: &dyn DirectRunClient,
) -> ClientResult<()> {
    match client.fetch_placement(key).await? {
        Some(existing) => {
            debug!(
                %key,
                instances = existing.instances,
                annotation = %existing.annotation,
                "placement exists, updating"
            );
            client
                .update_placement(key, &PlacementUpdate::from(spec))
                .await
        }
        None => {
            debug!(%key, "no placement found, creating");
            client.create_placement(spec).await
        }
    }
}
