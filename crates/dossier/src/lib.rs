//! Personnel file tracking for HR operations.
//!
//! The [`resolution`] module holds the pure lookup engine: employee code to locker,
//! employee code to legal entity, and the onboarding checklist status report. The
//! [`records`] module layers employees, checklist submissions, file custody, user
//! accounts and the activity trail on top of it behind storage and mail traits.

pub mod config;
pub mod error;
pub mod records;
pub mod resolution;
pub mod telemetry;
