mod helpers;
mod provisioning_test;
mod session_test;
