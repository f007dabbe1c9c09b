pub mod provisioning;
pub mod session;
pub mod task;
