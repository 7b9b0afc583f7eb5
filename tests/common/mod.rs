//! Common test utilities for reconciler tests
//!
//! Provides an in-memory [`ClusterStore`] fake and an environment-variable
//! lock serializing tests that touch the operand image variable.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use kube::core::ObjectMeta;

use dummy_controller::controller::store::{ClusterStore, StoreError};
use dummy_controller::crd::{Dummy, DummySpec, DummyStatus};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serialize tests that read or mutate the operand image variable
pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Build a Dummy resource the way the API server would hand it out,
/// with a uid so controller owner references can be derived
pub fn dummy(name: &str, namespace: &str, message: &str, size: i32) -> Dummy {
    let mut dummy = Dummy::new(
        name,
        DummySpec {
            message: message.to_owned(),
            size,
        },
    );
    dummy.metadata = ObjectMeta {
        name: Some(name.to_owned()),
        namespace: Some(namespace.to_owned()),
        uid: Some(format!("uid-{name}")),
        ..ObjectMeta::default()
    };
    dummy
}

type Key = (String, String);

/// In-memory stand-in for the cluster API
///
/// Objects live in maps keyed by `(name, namespace)`. Status patches are
/// applied to the stored Dummy, so a later pass observes what an earlier
/// pass wrote, and every write is also recorded for assertions.
#[derive(Debug, Default)]
pub struct FakeStore {
    dummies: Mutex<HashMap<Key, Dummy>>,
    deployments: Mutex<HashMap<Key, Deployment>>,
    status_writes: Mutex<Vec<DummyStatus>>,
    pub fail_deployment_get: AtomicBool,
    pub conflict_on_status_update: AtomicBool,
}

impl FakeStore {
    pub fn insert_dummy(&self, dummy: Dummy) {
        let key = key_of(&dummy.metadata);
        self.dummies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, dummy);
    }

    pub fn insert_deployment(&self, namespace: &str, deployment: Deployment) {
        let name = deployment.metadata.name.clone().unwrap_or_default();
        self.deployments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((name, namespace.to_owned()), deployment);
    }

    pub fn stored_dummy(&self, name: &str, namespace: &str) -> Option<Dummy> {
        self.dummies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(name.to_owned(), namespace.to_owned()))
            .cloned()
    }

    pub fn stored_deployment(&self, name: &str, namespace: &str) -> Option<Deployment> {
        self.deployments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(name.to_owned(), namespace.to_owned()))
            .cloned()
    }

    pub fn deployment_count(&self) -> usize {
        self.deployments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn status_write_count(&self) -> usize {
        self.status_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn transient() -> StoreError {
        StoreError::Transient(kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".to_owned(),
            message: "injected transient failure".to_owned(),
            reason: "InternalError".to_owned(),
            code: 500,
        }))
    }
}

fn key_of(metadata: &ObjectMeta) -> Key {
    (
        metadata.name.clone().unwrap_or_default(),
        metadata.namespace.clone().unwrap_or_default(),
    )
}

#[async_trait]
impl ClusterStore for FakeStore {
    async fn dummy(&self, name: &str, namespace: &str) -> Result<Dummy, StoreError> {
        self.stored_dummy(name, namespace).ok_or(StoreError::NotFound)
    }

    async fn deployment(&self, name: &str, namespace: &str) -> Result<Deployment, StoreError> {
        if self.fail_deployment_get.load(Ordering::Relaxed) {
            return Err(Self::transient());
        }
        self.stored_deployment(name, namespace)
            .ok_or(StoreError::NotFound)
    }

    async fn create_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<(), StoreError> {
        let name = deployment.metadata.name.clone().unwrap_or_default();
        let key = (name, namespace.to_owned());
        let mut deployments = self
            .deployments
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if deployments.contains_key(&key) {
            return Err(StoreError::Conflict);
        }
        deployments.insert(key, deployment.clone());
        Ok(())
    }

    async fn update_dummy_status(
        &self,
        name: &str,
        namespace: &str,
        status: &DummyStatus,
    ) -> Result<(), StoreError> {
        if self.conflict_on_status_update.load(Ordering::Relaxed) {
            return Err(StoreError::Conflict);
        }
        let mut dummies = self.dummies.lock().unwrap_or_else(PoisonError::into_inner);
        let dummy = dummies
            .get_mut(&(name.to_owned(), namespace.to_owned()))
            .ok_or(StoreError::NotFound)?;
        dummy.status = Some(status.clone());
        self.status_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(status.clone());
        Ok(())
    }
}
