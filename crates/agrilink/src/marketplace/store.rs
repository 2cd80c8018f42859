//! Shared persistent-store contract.
//!
//! Every entity kind maps to one durable collection keyed by an
//! auto-incrementing integer id; the id is assigned by the store on insert.
//! Referential integrity is not enforced across collections: an admin
//! delete may orphan foreign keys, and read-side joins tolerate that.

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
