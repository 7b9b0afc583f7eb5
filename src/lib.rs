//! # Dummy Controller Library
//!
//! Core functionality for the Dummy controller: the `Dummy` custom
//! resource, the reconcile pass that manages a Deployment per resource,
//! and the ambient metrics/probe plumbing.
//!
//! Tests for pure helpers live in their module files; the reconcile pass
//! is exercised end to end in `tests/` against a fake cluster store.

pub mod constants;
pub mod controller;
pub mod crd;
pub mod observability;
pub mod server;

// CRD types - needed by the reconciler, binaries, and tests
pub use crd::{Condition, Dummy, DummySpec, DummyStatus};
