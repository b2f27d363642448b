//! Process identity derivation.
//!
//! Both scheduler backends address workloads by a key the control
//! plane derives locally; the backend never mints one. The key must be
//! stable for a given process state and rotate when the version
//! rotates, so a restarted process with a new spec gets a fresh
//! scheduler-side representation.

use serde::{Deserialize, Serialize};
use std::fmt;

use gantry_core::{ProcessRecord, StagingDetails};

/// Deterministic addressing key used on every backend call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessIdentity(String);

impl ProcessIdentity {
    /// Derive the identity for a process: `{guid}-{version}`.
    ///
    /// Guids are unique per process and versions are unique per spec
    /// change, so two distinct processes can never share an identity.
    pub fn from_process(process: &ProcessRecord) -> Self {
        Self(format!("{}-{}", process.guid, process.version))
    }

    /// Derive the identity for a staging attempt.
    ///
    /// A staging task is addressed by the droplet it will produce.
    pub fn for_staging(details: &StagingDetails) -> Self {
        Self(details.droplet.guid.clone())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProcessIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProcessIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
