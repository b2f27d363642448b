//! gantry-protocol — scheduler payload construction.
//!
//! Pure builders for everything the dispatcher submits to a backend:
//! addressing identities, legacy wire messages, and direct placement
//! recipes. Nothing in this crate performs I/O or mutates its inputs;
//! `gantry-dispatch` owns the client calls.
//!
//! # Components
//!
//! - **`identity`** — deterministic addressing keys for processes and
//!   staging attempts
//! - **`translate`** — messages for the legacy stage/run services
//! - **`recipe`** — staging tasks and placement specs for the direct
//!   backend

pub mod identity;
pub mod recipe;
pub mod translate;

pub use identity::ProcessIdentity;
pub use recipe::{DesiredPlacementSpec, PlacementUpdate, RecipeBuilder, StagingTaskSpec};
pub use translate::{
    DesireEnvelope, DesireRequest, StageRequest, desire_envelope, desire_request, stage_request,
};
