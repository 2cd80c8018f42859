//! AgriLink core: the marketplace engine behind the HTTP service.
//!
//! Everything stateful lives behind repository traits so the services can be
//! exercised against in-memory stores in tests and wired to a durable store
//! by the host binary.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
