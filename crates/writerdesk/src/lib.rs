//! Back-office engine for a writing-services business: order pricing, dissertation payment
//! ledgers, invoice assembly and dashboard reporting over a pluggable document store.

pub mod config;
pub mod error;
pub mod store;
pub mod telemetry;
pub mod workflows;
