//! Shared helpers for the backend's unit and integration tests: one-time
//! logging setup and assertions on the problem+json error contract.

pub mod logging;
pub mod problem_details;
