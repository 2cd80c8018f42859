use chrono::{DateTime, Utc};

use super::domain::{Session, SessionToken, User, UserId, UserRole};
use crate::marketplace::store::RepositoryError;

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Storage abstraction for user records.
///
/// `insert` enforces case-insensitive email uniqueness atomically and
/// reports a collision as [`RepositoryError::Conflict`].
pub trait UserRepository: Send + Sync {
    fn insert(&self, record: NewUserRecord) -> Result<User, RepositoryError>;
    fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
}

/// Server-side session bindings, keyed by the opaque token.
pub trait SessionStore: Send + Sync {
    fn insert(&self, session: Session) -> Result<(), RepositoryError>;
    fn resolve(&self, token: &SessionToken) -> Result<Option<Session>, RepositoryError>;
    /// Removing an unknown token is a no-op, not an error.
    fn remove(&self, token: &SessionToken) -> Result<(), RepositoryError>;
}
