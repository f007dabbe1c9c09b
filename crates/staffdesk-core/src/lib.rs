//! Shared service plumbing for Staffdesk services.
//!
//! Keep this crate free of domain logic — it only carries the bits every
//! service binary needs at the edges (tracing setup, request-id middleware,
//! wire-format helpers). Health probes live in each service, next to the
//! resources they check.

pub mod middleware;
pub mod serde;
pub mod tracing;
