//! # Error Policy
//!
//! Dispatcher-side retry policy for failed reconcile passes. The reconcile
//! pass itself never retries or computes backoff; every failure lands here
//! and is mapped to a requeue delay.

use std::sync::Arc;
use std::time::Duration;

use kube::runtime::controller::Action;
use kube::ResourceExt;
use tracing::error;

use crate::constants::{CONFLICT_REQUEUE_SECS, DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS};
use crate::controller::reconciler::{Error, Reconciler};
use crate::controller::store::{ClusterStore, StoreError};
use crate::crd::Dummy;
use crate::observability::metrics;

/// Map a failed pass to its retry action
///
/// Optimistic-concurrency conflicts retry promptly; everything else waits
/// for the default error requeue interval.
pub fn error_policy<S: ClusterStore>(
    dummy: Arc<Dummy>,
    error: &Error,
    _ctx: Arc<Reconciler<S>>,
) -> Action {
    let name = dummy.name_any();
    let namespace = dummy.namespace().unwrap_or_else(|| "default".to_owned());
    error!(%name, %namespace, error = %error, "Reconciliation error");
    metrics::increment_reconciliation_errors();
    requeue_for(error)
}

fn requeue_for(error: &Error) -> Action {
    match error {
        Error::Store(StoreError::Conflict) => {
            Action::requeue(Duration::from_secs(CONFLICT_REQUEUE_SECS))
        }
        Error::MissingOperandImage | Error::Store(_) => Action::requeue(Duration::from_secs(
            DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_retry_promptly() {
        let action = requeue_for(&Error::Store(StoreError::Conflict));
        assert_eq!(
            action,
            Action::requeue(Duration::from_secs(CONFLICT_REQUEUE_SECS))
        );
    }

    #[test]
    fn other_errors_use_default_requeue() {
        let action = requeue_for(&Error::MissingOperandImage);
        assert_eq!(
            action,
            Action::requeue(Duration::from_secs(
                DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS
            ))
        );
    }
}
