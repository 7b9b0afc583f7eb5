//! # Observability
//!
//! Prometheus metrics for the controller. Metrics are served by the HTTP
//! server in `crate::server`.

pub mod metrics;
