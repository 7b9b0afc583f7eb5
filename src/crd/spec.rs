//! # Dummy Spec
//!
//! Main CRD specification types.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::status::DummyStatus;

/// Dummy Custom Resource Definition
///
/// Declares the desired state for a managed workload: a message that the
/// controller echoes back into the status, and a declared replica count.
///
/// # Example
///
/// ```yaml
/// apiVersion: example.com/v1alpha1
/// kind: Dummy
/// metadata:
///   name: dummy-sample
///   namespace: default
/// spec:
///   message: I'm just a dummy
///   size: 1
/// ```
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[kube(
    kind = "Dummy",
    group = "example.com",
    version = "v1alpha1",
    namespaced,
    status = "DummyStatus",
    printcolumn = r#"{"name":"Phase", "type":"string", "jsonPath":".status.podStatus"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct DummySpec {
    /// Free-form message mirrored into `status.echoSpec` on every pass
    pub message: String,
    /// Declared replica count for the managed Deployment.
    /// Accepted but not yet applied; the Deployment is created with a
    /// fixed single replica.
    #[serde(default)]
    pub size: i32,
}
