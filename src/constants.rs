//! # Constants
//!
//! Shared constants used throughout the controller.
//!
//! These values represent reasonable defaults and can be overridden via
//! configuration or environment variables where applicable.

/// Environment variable holding the operand image reference for managed
/// Deployments. The builder fails hard when it is unset.
pub const OPERAND_IMAGE_ENV: &str = "DUMMY_IMAGE";

/// Finalizer name reserved for deletion-time cleanup.
///
/// Not registered on any resource yet; cleanup of managed Deployments
/// currently relies on owner-reference garbage collection.
pub const DUMMY_FINALIZER: &str = "example.com/finalizer";

/// Field manager name used for status patches and event reporting
pub const CONTROLLER_NAME: &str = "dummy-controller";

/// Phase value once a Deployment has been created or observed
pub const PHASE_RUNNING: &str = "Running";

/// Phase value for a resource whose Deployment pre-dates its status
pub const PHASE_PENDING: &str = "Pending";

/// Condition type tracking availability of the managed Deployment
pub const CONDITION_TYPE_AVAILABLE: &str = "Available";

/// Condition reason recorded when the reconcile pass creates the Deployment
pub const REASON_RECONCILING: &str = "Reconciling";

/// Replica count for managed Deployments.
///
/// `spec.size` is accepted on the Dummy resource but is not wired into
/// this value; the gap is flagged in the test suite.
pub const MANAGED_REPLICAS: i32 = 1;

/// Default HTTP server port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 5000;

/// Requeue delay after a Deployment is created (seconds), so the pass
/// re-observes the new workload once it has had time to stabilize
pub const POST_CREATE_REQUEUE_SECS: u64 = 60;

/// Default requeue interval for reconciliation errors (seconds)
pub const DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS: u64 = 60;

/// Requeue interval after an optimistic-concurrency conflict (seconds)
pub const CONFLICT_REQUEUE_SECS: u64 = 5;
