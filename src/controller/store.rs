//! # Cluster Store
//!
//! Access to the two object kinds the reconciler works with: the `Dummy`
//! resource and its managed `Deployment`.
//!
//! The reconciler only ever talks to the cluster through the [`ClusterStore`]
//! trait, so tests can substitute an in-memory fake for the live API server.
//! Failures are classified into [`StoreError`] so callers can distinguish
//! absence and optimistic-concurrency conflicts from other failures.

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use kube::api::{Patch, PatchParams, PostParams};
use kube::{Api, Client};
use thiserror::Error;

use crate::constants::CONTROLLER_NAME;
use crate::crd::{Dummy, DummyStatus};

/// Classified failure from a cluster store operation
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested object does not exist
    #[error("object not found")]
    NotFound,
    /// The write raced with a newer version of the object
    #[error("write conflicted with a newer object version")]
    Conflict,
    /// Any other read/write failure; retried by the dispatcher
    #[error("cluster API request failed: {0}")]
    Transient(#[source] kube::Error),
}

impl From<kube::Error> for StoreError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(ref resp) if resp.code == 404 => StoreError::NotFound,
            kube::Error::Api(ref resp) if resp.code == 409 => StoreError::Conflict,
            other => StoreError::Transient(other),
        }
    }
}

/// Get/create/update operations over the two object kinds, keyed by
/// name + namespace
#[async_trait]
pub trait ClusterStore: Send + Sync {
    /// Fetch the Dummy resource at the given identity
    async fn dummy(&self, name: &str, namespace: &str) -> Result<Dummy, StoreError>;

    /// Fetch the Deployment at the given identity
    async fn deployment(&self, name: &str, namespace: &str) -> Result<Deployment, StoreError>;

    /// Create a new Deployment in the given namespace
    async fn create_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<(), StoreError>;

    /// Patch the status subresource of the Dummy at the given identity
    async fn update_dummy_status(
        &self,
        name: &str,
        namespace: &str,
        status: &DummyStatus,
    ) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: ClusterStore> ClusterStore for std::sync::Arc<T> {
    async fn dummy(&self, name: &str, namespace: &str) -> Result<Dummy, StoreError> {
        (**self).dummy(name, namespace).await
    }

    async fn deployment(&self, name: &str, namespace: &str) -> Result<Deployment, StoreError> {
        (**self).deployment(name, namespace).await
    }

    async fn create_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<(), StoreError> {
        (**self).create_deployment(namespace, deployment).await
    }

    async fn update_dummy_status(
        &self,
        name: &str,
        namespace: &str,
        status: &DummyStatus,
    ) -> Result<(), StoreError> {
        (**self).update_dummy_status(name, namespace, status).await
    }
}

/// [`ClusterStore`] backed by the live Kubernetes API
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl std::fmt::Debug for KubeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeStore").finish_non_exhaustive()
    }
}

impl KubeStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClusterStore for KubeStore {
    async fn dummy(&self, name: &str, namespace: &str) -> Result<Dummy, StoreError> {
        let api: Api<Dummy> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get(name).await?)
    }

    async fn deployment(&self, name: &str, namespace: &str) -> Result<Deployment, StoreError> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get(name).await?)
    }

    async fn create_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<(), StoreError> {
        let api: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        api.create(&PostParams::default(), deployment).await?;
        Ok(())
    }

    async fn update_dummy_status(
        &self,
        name: &str,
        namespace: &str,
        status: &DummyStatus,
    ) -> Result<(), StoreError> {
        let api: Api<Dummy> = Api::namespaced(self.client.clone(), namespace);
        let patch = serde_json::json!({ "status": status });
        api.patch_status(
            name,
            &PatchParams::apply(CONTROLLER_NAME),
            &Patch::Merge(patch),
        )
        .await?;
        Ok(())
    }
}
