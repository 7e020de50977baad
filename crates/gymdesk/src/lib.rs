//! Gymdesk domain library.
//!
//! Carries the appointment scheduling core (availability, validation, booking,
//! approval, discovery) and the AI coaching advisor, along with the shared
//! configuration, telemetry, and error plumbing used by the API service.

pub mod advisor;
pub mod config;
pub mod error;
pub mod scheduling;
pub mod telemetry;
