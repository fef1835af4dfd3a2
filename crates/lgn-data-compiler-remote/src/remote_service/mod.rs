//! Logic for the remote execution service, associated workers and connecting client that initiates jobs.

pub mod client;
pub mod common_types;
pub mod service;
pub mod worker;
