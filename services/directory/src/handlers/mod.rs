pub mod changes;
pub mod employee;
pub mod health;
pub mod session;
pub mod task;
