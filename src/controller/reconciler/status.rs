//! # Status Updates
//!
//! Writes observed and derived state back onto the Dummy status
//! subresource, as the last step of a reconcile pass.

use kube::ResourceExt;
use tracing::debug;

use crate::constants::{
    CONDITION_TYPE_AVAILABLE, PHASE_PENDING, PHASE_RUNNING, REASON_RECONCILING,
};
use crate::crd::{Condition, Dummy, DummyStatus};

use crate::controller::store::ClusterStore;
use super::Error;

/// Status written right after the managed Deployment has been created
///
/// The phase becomes `Running` and an `Available` condition records the
/// creation, quoting the declared replica count from the spec.
pub fn created_status(dummy: &Dummy) -> DummyStatus {
    let current = dummy.status.as_ref();
    let mut conditions = current.map(|s| s.conditions.clone()).unwrap_or_default();
    conditions.push(Condition {
        r#type: CONDITION_TYPE_AVAILABLE.to_owned(),
        status: "True".to_owned(),
        last_transition_time: Some(chrono::Utc::now().to_rfc3339()),
        reason: Some(REASON_RECONCILING.to_owned()),
        message: Some(format!(
            "Deployment for custom resource ({}) with {} replicas created successfully",
            dummy.name_any(),
            dummy.spec.size
        )),
    });
    DummyStatus {
        pod_status: Some(PHASE_RUNNING.to_owned()),
        echo_spec: current.and_then(|s| s.echo_spec.clone()),
        conditions,
    }
}

/// Status for a pass that found the managed Deployment already present
///
/// An empty phase defaults to `Pending`; the spec message is mirrored into
/// `echoSpec` regardless of phase.
pub fn observed_status(dummy: &Dummy) -> DummyStatus {
    let current = dummy.status.as_ref();
    let phase = current
        .and_then(|s| s.pod_status.clone())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| PHASE_PENDING.to_owned());
    DummyStatus {
        pod_status: Some(phase),
        echo_spec: Some(dummy.spec.message.clone()),
        conditions: current.map(|s| s.conditions.clone()).unwrap_or_default(),
    }
}

/// Record the post-creation status on the Dummy
pub async fn update_created<S: ClusterStore>(store: &S, dummy: &Dummy) -> Result<(), Error> {
    let status = created_status(dummy);
    let namespace = dummy.namespace().unwrap_or_else(|| "default".to_owned());
    store
        .update_dummy_status(&dummy.name_any(), &namespace, &status)
        .await?;
    Ok(())
}

/// Refresh the observed status on the Dummy
///
/// Checks whether the phase and mirrored message actually changed before
/// patching, so repeated passes with no external change stay write-free.
pub async fn update_observed<S: ClusterStore>(store: &S, dummy: &Dummy) -> Result<(), Error> {
    let status = observed_status(dummy);
    let current = dummy.status.as_ref();
    let phase_unchanged =
        current.and_then(|s| s.pod_status.as_deref()) == status.pod_status.as_deref();
    let echo_unchanged =
        current.and_then(|s| s.echo_spec.as_deref()) == status.echo_spec.as_deref();
    if phase_unchanged && echo_unchanged {
        debug!(
            name = %dummy.name_any(),
            "Skipping status update - phase and echoSpec unchanged"
        );
        return Ok(());
    }

    let namespace = dummy.namespace().unwrap_or_else(|| "default".to_owned());
    store
        .update_dummy_status(&dummy.name_any(), &namespace, &status)
        .await?;
    Ok(())
}
