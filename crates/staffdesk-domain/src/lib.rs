//! Domain types shared across Staffdesk services.
//!
//! This crate contains only pure types and functions with no framework
//! dependencies. Import in `usecase/` and `domain/` layers; never in
//! `infra/` or `handlers/`.

pub mod assignment;
pub mod code;
pub mod credentials;
pub mod validate;
