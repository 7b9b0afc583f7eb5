//! # Dummy Controller
//!
//! A Kubernetes controller that manages a Deployment for each `Dummy`
//! custom resource and mirrors observed state back onto its status.
//!
//! ## Overview
//!
//! 1. **Watching Dummy resources** - Reconciles on every change across all
//!    namespaces
//! 2. **Watching owned Deployments** - Changes to a managed Deployment
//!    re-trigger its owner's reconcile pass
//! 3. **Deployment management** - Creates a restrictively-configured
//!    Deployment when one is missing, owned by the Dummy for cascading
//!    deletion
//! 4. **Status reporting** - Tracks a coarse phase and mirrors the spec
//!    message into the status
//! 5. **Prometheus metrics** - Exposes metrics and health probes over HTTP

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use kube::runtime::events::{Recorder, Reporter};
use kube::{Api, Client};
use kube_runtime::{watcher, Controller};
use tracing::info;

use dummy_controller::constants::{CONTROLLER_NAME, DEFAULT_METRICS_PORT};
use dummy_controller::controller::error_policy::error_policy;
use dummy_controller::controller::reconciler::Reconciler;
use dummy_controller::controller::store::KubeStore;
use dummy_controller::crd::Dummy;
use dummy_controller::observability::metrics;
use dummy_controller::server::{start_server, ServerState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dummy_controller=info".into()),
        )
        .init();

    info!("Starting Dummy controller");

    metrics::register_metrics()?;

    let server_state = Arc::new(ServerState {
        is_ready: AtomicBool::new(false),
    });

    let server_port = std::env::var("METRICS_PORT")
        .ok()
        .and_then(|port| port.parse::<u16>().ok())
        .unwrap_or(DEFAULT_METRICS_PORT);

    let server_state_clone = Arc::clone(&server_state);
    tokio::spawn(async move {
        if let Err(err) = start_server(server_port, server_state_clone).await {
            tracing::error!("HTTP server error: {}", err);
        }
    });

    let client = Client::try_default().await?;

    // Watch Dummy resources across all namespaces, plus the Deployments
    // they own so drift in the runtime object re-triggers the owner.
    let dummies: Api<Dummy> = Api::all(client.clone());
    let deployments: Api<Deployment> = Api::all(client.clone());

    let recorder = Recorder::new(
        client.clone(),
        Reporter {
            controller: CONTROLLER_NAME.into(),
            instance: None,
        },
    );
    let reconciler = Arc::new(Reconciler::new(KubeStore::new(client)).with_recorder(recorder));

    server_state.is_ready.store(true, Ordering::Relaxed);

    Controller::new(dummies, watcher::Config::default())
        .owns(deployments, watcher::Config::default())
        .shutdown_on_signal()
        .run(Reconciler::reconcile, error_policy, reconciler)
        .for_each(|_| std::future::ready(()))
        .await;

    info!("Controller stopped");

    Ok(())
}
