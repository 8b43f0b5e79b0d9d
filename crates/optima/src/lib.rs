//! Quota-aware internship allocation.
//!
//! The [`workflows::allocation`] module holds the engine (ledger, scorer, driver) together
//! with the service facade and HTTP router. [`workflows::roster`] imports candidate and
//! position rosters from CSV exports.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
