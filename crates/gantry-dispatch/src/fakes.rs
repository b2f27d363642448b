//! Recording fakes for the backend client traits.
//!
//! Each fake records the calls it receives and can be primed to fail
//! its next call. [`FakeDirectRun`] additionally keeps a placement
//! table so reconciliation tests can observe backend end state.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use gantry_protocol::identity::ProcessIdentity;
use gantry_protocol::recipe::{DesiredPlacementSpec, PlacementUpdate, StagingTaskSpec};
use gantry_protocol::translate::{DesireRequest, StageRequest};

use crate::clients::{
    ClientError, ClientResult, DirectRunClient, DirectStageClient, LegacyRunClient,
    LegacyStageClient, PlacementSummary,
};

#[derive(Default)]
pub struct FakeLegacyStage {
    pub stage_calls: Mutex<Vec<(String, StageRequest)>>,
    pub stop_staging_calls: Mutex<Vec<String>>,
    fail_next: Mutex<Option<ClientError>>,
}

impl FakeLegacyStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, err: ClientError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub fn total_calls(&self) -> usize {
        self.stage_calls.lock().unwrap().len() + self.stop_staging_calls.lock().unwrap().len()
    }

    fn take_failure(&self) -> Option<ClientError> {
        self.fail_next.lock().unwrap().take()
    }
}

#[async_trait]
impl LegacyStageClient for FakeLegacyStage {
    async fn stage(&self, key: &ProcessIdentity, request: &StageRequest) -> ClientResult<()> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        self.stage_calls
            .lock()
            .unwrap()
            .push((key.to_string(), request.clone()));
        Ok(())
    }

    async fn stop_staging(&self, key: &ProcessIdentity) -> ClientResult<()> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        self.stop_staging_calls.lock().unwrap().push(key.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeLegacyRun {
    pub desire_calls: Mutex<Vec<(String, DesireRequest)>>,
    pub stop_index_calls: Mutex<Vec<(String, u32)>>,
    pub stop_calls: Mutex<Vec<String>>,
    fail_next: Mutex<Option<ClientError>>,
}

impl FakeLegacyRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, err: ClientError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub fn total_calls(&self) -> usize {
        self.desire_calls.lock().unwrap().len()
            + self.stop_index_calls.lock().unwrap().len()
            + self.stop_calls.lock().unwrap().len()
    }

    fn take_failure(&self) -> Option<ClientError> {
        self.fail_next.lock().unwrap().take()
    }
}

#[async_trait]
impl LegacyRunClient for FakeLegacyRun {
    async fn desire(&self, key: &ProcessIdentity, request: &DesireRequest) -> ClientResult<()> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        self.desire_calls
            .lock()
            .unwrap()
            .push((key.to_string(), request.clone()));
        Ok(())
    }

    async fn stop_index(&self, key: &ProcessIdentity, index: u32) -> ClientResult<()> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        self.stop_index_calls
            .lock()
            .unwrap()
            .push((key.to_string(), index));
        Ok(())
    }

    async fn stop(&self, key: &ProcessIdentity) -> ClientResult<()> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        self.stop_calls.lock().unwrap().push(key.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeDirectStage {
    pub stage_calls: Mutex<Vec<(String, StagingTaskSpec)>>,
    fail_next: Mutex<Option<ClientError>>,
}

impl FakeDirectStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, err: ClientError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub fn total_calls(&self) -> usize {
        self.stage_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl DirectStageClient for FakeDirectStage {
    async fn stage(&self, key: &ProcessIdentity, task: &StagingTaskSpec) -> ClientResult<()> {
        if let Some(err) = self.fail_next.lock().unwrap().take() {
            return Err(err);
        }
        self.stage_calls
            .lock()
            .unwrap()
            .push((key.to_string(), task.clone()));
        Ok(())
    }
}

/// Verbs of [`DirectRunClient`], for targeted failure injection.
///
/// The direct run fake serves two calls per reconcile (probe plus
/// apply), so "fail the next call" alone cannot express "the probe
/// succeeds but the create fails".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectRunVerb {
    Fetch,
    Create,
    Update,
    Stop,
}

#[derive(Default)]
pub struct FakeDirectRun {
    pub fetch_calls: Mutex<Vec<String>>,
    pub create_calls: Mutex<Vec<DesiredPlacementSpec>>,
    pub update_calls: Mutex<Vec<(String, PlacementUpdate)>>,
    pub stop_calls: Mutex<Vec<String>>,
    /// Fake backend table: key → placement summary.
    pub placements: Mutex<HashMap<String, PlacementSummary>>,
    fail_next: Mutex<Option<(DirectRunVerb, ClientError)>>,
}

impl FakeDirectRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, verb: DirectRunVerb, err: ClientError) {
        *self.fail_next.lock().unwrap() = Some((verb, err));
    }

    pub fn total_calls(&self) -> usize {
        self.fetch_calls.lock().unwrap().len()
            + self.create_calls.lock().unwrap().len()
            + self.update_calls.lock().unwrap().len()
            + self.stop_calls.lock().unwrap().len()
    }

    /// Seed an existing placement, as if a previous create had happened.
    pub fn seed_placement(&self, key: &str, summary: PlacementSummary) {
        self.placements
            .lock()
            .unwrap()
            .insert(key.to_string(), summary);
    }

    /// Snapshot of the placement table for end-state assertions.
    pub fn placement_table(&self) -> HashMap<String, PlacementSummary> {
        self.placements.lock().unwrap().clone()
    }

    fn take_failure(&self, verb: DirectRunVerb) -> Option<ClientError> {
        let mut slot = self.fail_next.lock().unwrap();
        if slot.as_ref().is_some_and(|(v, _)| *v == verb) {
            slot.take().map(|(_, err)| err)
        } else {
            None
        }
    }
}

#[async_trait]
impl DirectRunClient for FakeDirectRun {
    async fn fetch_placement(
        &self,
        key: &ProcessIdentity,
    ) -> ClientResult<Option<PlacementSummary>> {
        if let Some(err) = self.take_failure(DirectRunVerb::Fetch) {
            return Err(err);
        }
        self.fetch_calls.lock().unwrap().push(key.to_string());
        Ok(self.placements.lock().unwrap().get(key.as_str()).cloned())
    }

    async fn create_placement(&self, spec: &DesiredPlacementSpec) -> ClientResult<()> {
        if let Some(err) = self.take_failure(DirectRunVerb::Create) {
            return Err(err);
        }
        self.create_calls.lock().unwrap().push(spec.clone());
        self.placements.lock().unwrap().insert(
            spec.process_key.clone(),
            PlacementSummary {
                instances: spec.instances,
                annotation: spec.annotation.clone(),
            },
        );
        Ok(())
    }

    async fn update_placement(
        &self,
        key: &ProcessIdentity,
        update: &PlacementUpdate,
    ) -> ClientResult<()> {
        if let Some(err) = self.take_failure(DirectRunVerb::Update) {
            return Err(err);
        }
        self.update_calls
            .lock()
            .unwrap()
            .push((key.to_string(), update.clone()));
        let mut placements = self.placements.lock().unwrap();
        match placements.get_mut(key.as_str()) {
            Some(existing) => {
                existing.instances = update.instances;
                existing.annotation = update.annotation.clone();
                Ok(())
            }
            None => Err(ClientError::Rejected(format!("no placement for {key}"))),
        }
    }

    async fn stop(&self, key: &ProcessIdentity) -> ClientResult<()> {
        if let Some(err) = self.take_failure(DirectRunVerb::Stop) {
            return Err(err);
        }
        self.stop_calls.lock().unwrap().push(key.to_string());
        self.placements.lock().unwrap().remove(key.as_str());
        Ok(())
    }
}
