//! # Reconciler
//!
//! Core reconciliation logic for `Dummy` resources.
//!
//! Each pass:
//! - Fetches the Dummy resource; a vanished resource ends the pass cleanly
//! - Checks whether the managed Deployment exists
//! - Creates the Deployment when absent and records the creation in the
//!   status, with a delayed requeue to re-observe the new workload
//! - Otherwise mirrors the spec message into the status and waits for the
//!   next change
//!
//! A pass is safe to invoke arbitrarily often: repeated passes with no
//! external change perform no additional writes. Partial progress from a
//! cancelled pass (Deployment created, status not yet written) is corrected
//! by the next pass, which re-observes the Deployment and fixes the status.

pub mod deployment;
pub mod status;

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use kube::runtime::controller::Action;
use kube::runtime::events::Recorder;
use kube::ResourceExt;
use thiserror::Error as ThisError;
use tracing::{error, info};

use crate::constants::POST_CREATE_REQUEUE_SECS;
use crate::controller::events;
use crate::controller::store::{ClusterStore, StoreError};
use crate::crd::Dummy;
use crate::observability::metrics;

/// Failure of a single reconcile pass
///
/// Absence of the primary resource is not represented here; it ends the
/// pass cleanly. Everything else aborts the pass and is handed to the
/// dispatcher for retry.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The operand image environment variable is unset; the pass fails
    /// identically on retry until the environment is fixed
    #[error("DUMMY_IMAGE environment variable with the operand image is not set")]
    MissingOperandImage,
    /// Classified cluster store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reconciler context handed to every pass
///
/// Holds the injected cluster store and an optional event recorder. The
/// store is a trait object seam so tests can drive passes against an
/// in-memory fake.
pub struct Reconciler<S> {
    pub(crate) store: S,
    recorder: Option<Recorder>,
}

impl<S> fmt::Debug for Reconciler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler").finish_non_exhaustive()
    }
}

impl<S: ClusterStore> Reconciler<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            recorder: None,
        }
    }

    /// Attach a recorder publishing Kubernetes Events for the Dummy
    #[must_use]
    pub fn with_recorder(mut self, recorder: Recorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Entry point wired into the controller watch loop
    pub async fn reconcile(dummy: Arc<Dummy>, ctx: Arc<Self>) -> Result<Action, Error> {
        let name = dummy.name_any();
        let namespace = dummy.namespace().unwrap_or_else(|| "default".to_owned());
        ctx.reconcile_request(&name, &namespace).await
    }

    /// Run one reconcile pass for the identity `(name, namespace)`
    ///
    /// Returns the requeue decision: a delayed requeue right after a
    /// Deployment creation, otherwise wait for the next watch event.
    pub async fn reconcile_request(&self, name: &str, namespace: &str) -> Result<Action, Error> {
        let start = Instant::now();
        info!(%name, %namespace, "Reconciling Dummy");
        metrics::increment_reconciliations();

        let result = self.run_pass(name, namespace).await;
        metrics::observe_reconcile_duration(start.elapsed().as_secs_f64());
        result
    }

    async fn run_pass(&self, name: &str, namespace: &str) -> Result<Action, Error> {
        let dummy = match self.store.dummy(name, namespace).await {
            Ok(dummy) => dummy,
            Err(StoreError::NotFound) => {
                info!(
                    %name, %namespace,
                    "Dummy resource not found. Ignoring since object must be deleted"
                );
                return Ok(Action::await_change());
            }
            Err(err) => {
                error!(%name, %namespace, error = %err, "Failed to get Dummy");
                return Err(err.into());
            }
        };

        match self.store.deployment(name, namespace).await {
            Err(StoreError::NotFound) => self.create_deployment(&dummy, name, namespace).await,
            Err(err) => {
                error!(%name, %namespace, error = %err, "Failed to get Deployment");
                Err(err.into())
            }
            Ok(_existing) => {
                info!(
                    %name, %namespace, message = %dummy.spec.message,
                    "Deployment present; refreshing observed status"
                );
                status::update_observed(&self.store, &dummy).await?;
                Ok(Action::await_change())
            }
        }
    }

    async fn create_deployment(
        &self,
        dummy: &Dummy,
        name: &str,
        namespace: &str,
    ) -> Result<Action, Error> {
        let deployment = deployment::deployment_for(dummy).map_err(|err| {
            error!(%name, %namespace, error = %err, "Failed to define new Deployment for Dummy");
            err
        })?;

        self.store
            .create_deployment(namespace, &deployment)
            .await
            .map_err(|err| {
                error!(%name, %namespace, error = %err, "Failed to create new Deployment");
                err
            })?;
        info!(%name, %namespace, "Created new Deployment for Dummy");
        metrics::increment_deployments_created();

        if let Some(recorder) = &self.recorder {
            events::publish_created(recorder, dummy).await;
        }

        status::update_created(&self.store, dummy).await?;

        // Re-check the new workload after it has had time to stabilize.
        Ok(Action::requeue(Duration::from_secs(
            POST_CREATE_REQUEUE_SECS,
        )))
    }
}
