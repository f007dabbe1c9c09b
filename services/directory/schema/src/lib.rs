//! sea-orm entities for the directory service collections.

pub mod employees;
pub mod identities;
pub mod tasks;
pub mod users;
