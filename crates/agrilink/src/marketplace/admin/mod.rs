//! Credential-gated audit access across every store collection.
//!
//! There is no elevated session: every call re-verifies the credentials.
//! Deletes are unconditional and cascade nothing; readers of the affected
//! collections tolerate the resulting orphans.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::TableName;
pub use repository::AuditStore;
pub use router::admin_router;
pub use service::{AdminCredentials, AdminError, AdminService};
