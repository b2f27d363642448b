//! Backend routing policy.
//!
//! Pure selection of which scheduler backend serves a lifecycle
//! intent. Keeping the decision separate from the client calls lets
//! the policy be tested without any I/O, and keeps every lifecycle
//! verb independently routable during a backend migration.

use std::fmt;

use gantry_core::{DispatchConfig, LifecycleKind};

/// A lifecycle intent the dispatcher is about to submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchIntent {
    Stage { lifecycle: LifecycleKind },
    CancelStage,
    Run,
    StopProcess,
    StopInstance,
}

/// Which backend serves an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendChoice {
    Legacy,
    Direct,
}

impl fmt::Display for BackendChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendChoice::Legacy => write!(f, "legacy"),
            BackendChoice::Direct => write!(f, "direct"),
        }
    }
}

/// Select the backend for an intent under the given configuration.
///
/// Staging goes direct only when the flag is set and the lifecycle is
/// buildpack; the direct staging path serves no other lifecycle
/// family. Cancel-staging and stop-instance have no direct equivalent
/// and always stay on the legacy path.
pub fn choose_backend(intent: DispatchIntent, config: &DispatchConfig) -> BackendChoice {
    match intent {
        DispatchIntent::Stage { lifecycle } => {
            if config.use_direct_staging && lifecycle == LifecycleKind::Buildpack {
                BackendChoice::Direct
            } else {
                BackendChoice::Legacy
            }
        }
        DispatchIntent::Run | DispatchIntent::StopProcess => {
            if config.use_direct_apps {
                BackendChoice::Direct
            } else {
                BackendChoice::Legacy
            }
        }
        DispatchIntent::CancelStage | DispatchIntent::StopInstance => BackendChoice::Legacy,
    }
}
