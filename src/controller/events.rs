//! # Events
//!
//! Kubernetes Event publication for Dummy resources. Publication is best
//! effort; a failed event never fails the reconcile pass.

use kube::runtime::events::{Event, EventType, Recorder};
use kube::{Resource, ResourceExt};
use tracing::warn;

use crate::crd::Dummy;

pub const REASON_CREATED: &str = "Created";

/// Record a Normal event on the Dummy after its Deployment was created
pub async fn publish_created(recorder: &Recorder, dummy: &Dummy) {
    let event = Event {
        type_: EventType::Normal,
        reason: REASON_CREATED.to_owned(),
        note: Some(format!(
            "Created Deployment for custom resource {}",
            dummy.name_any()
        )),
        action: "Create".to_owned(),
        secondary: None,
    };
    if let Err(err) = recorder.publish(&event, &dummy.object_ref(&())).await {
        warn!(name = %dummy.name_any(), error = %err, "Failed to publish event");
    }
}
