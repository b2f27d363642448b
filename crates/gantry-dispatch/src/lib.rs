//! gantry-dispatch — lifecycle dispatch over two scheduler back ends.
//!
//! The dispatcher receives lifecycle intents (stage, run, stop) from
//! the rest of the control plane and projects them onto either the
//! legacy polling-based scheduler integration or the direct
//! cluster-scheduler integration, selected per operation by runtime
//! configuration. Payloads come from `gantry-protocol`; this crate
//! owns routing, reconciliation, and the client calls.
//!
//! # Architecture
//!
//! ```text
//! Dispatcher
//!   ├── routing        (pure backend selection per intent)
//!   ├── gantry-protocol (identity, legacy messages, recipes)
//!   ├── reconcile      (create-or-update against the direct backend)
//!   └── clients        (four injected RPC stubs)
//! ```

pub mod clients;
pub mod dispatcher;
pub mod error;
pub mod reconcile;
pub mod routing;

#[cfg(test)]
mod fakes;

pub use clients::{
    ClientError, ClientResult, DirectRunClient, DirectStageClient, LegacyRunClient,
    LegacyStageClient, PlacementSummary,
};
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, DispatchResult};
pub use routing::{BackendChoice, DispatchIntent, choose_backend};
