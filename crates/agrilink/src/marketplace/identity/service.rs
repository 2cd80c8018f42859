use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::domain::{Actor, NewUser, Session, SessionToken, User, UserRole};
use super::password;
use super::repository::{NewUserRecord, SessionStore, UserRepository};
use crate::marketplace::store::RepositoryError;

/// Registration, login, and session resolution.
pub struct IdentityService<U, S> {
    users: Arc<U>,
    sessions: Arc<S>,
}

impl<U, S> IdentityService<U, S>
where
    U: UserRepository + 'static,
    S: SessionStore + 'static,
{
    pub fn new(users: Arc<U>, sessions: Arc<S>) -> Self {
        Self { users, sessions }
    }

    /// Create an account. The secret is hashed before the record is built;
    /// the plaintext never reaches the store.
    pub fn register(&self, registration: NewUser) -> Result<User, IdentityError> {
        let name = registration.name.trim();
        if name.is_empty() {
            return Err(IdentityError::MissingField { field: "name" });
        }
        let email = registration.email.trim();
        if email.is_empty() {
            return Err(IdentityError::MissingField { field: "email" });
        }
        if registration.password.is_empty() {
            return Err(IdentityError::MissingField { field: "password" });
        }

        let password_hash = password::hash_secret(&registration.password)
            .map_err(|err| IdentityError::Hashing(err.to_string()))?;

        let user = self
            .users
            .insert(NewUserRecord {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                role: registration.role,
                created_at: Utc::now(),
            })
            .map_err(|err| match err {
                RepositoryError::Conflict => IdentityError::DuplicateEmail,
                other => IdentityError::Repository(other),
            })?;

        debug!(user = %user.id, role = user.role.label(), "account registered");
        Ok(user)
    }

    /// Authenticate and open a session. The asserted role must match the
    /// stored one; a mismatch is reported distinctly from bad credentials.
    pub fn login(
        &self,
        email: &str,
        secret: &str,
        asserted_role: UserRole,
    ) -> Result<(User, SessionToken), IdentityError> {
        let user = self
            .users
            .find_by_email(email.trim())?
            .ok_or(IdentityError::InvalidCredentials)?;

        let verified = password::verify_secret(secret, &user.password_hash)
            .map_err(|err| IdentityError::Hashing(err.to_string()))?;
        if !verified {
            return Err(IdentityError::InvalidCredentials);
        }

        if user.role != asserted_role {
            return Err(IdentityError::RoleMismatch);
        }

        let token = SessionToken::generate();
        self.sessions.insert(Session {
            token: token.clone(),
            user_id: user.id,
            created_at: Utc::now(),
        })?;

        debug!(user = %user.id, "session opened");
        Ok((user, token))
    }

    /// Resolve the user bound to a token, if any.
    pub fn current_user(&self, token: &SessionToken) -> Result<Option<User>, IdentityError> {
        let Some(session) = self.sessions.resolve(token)? else {
            return Ok(None);
        };
        Ok(self.users.fetch(session.user_id)?)
    }

    /// Drop the session binding. Unknown tokens are ignored.
    pub fn logout(&self, token: &SessionToken) -> Result<(), IdentityError> {
        self.sessions.remove(token)?;
        Ok(())
    }
}

/// Narrow seam the protected routers use to turn a bearer token into an
/// [`Actor`] without seeing session internals.
pub trait ActorResolver: Send + Sync {
    fn resolve_actor(&self, token: &str) -> Result<Option<Actor>, RepositoryError>;
}

impl<U, S> ActorResolver for IdentityService<U, S>
where
    U: UserRepository + 'static,
    S: SessionStore + 'static,
{
    fn resolve_actor(&self, token: &str) -> Result<Option<Actor>, RepositoryError> {
        let token = SessionToken(token.to_string());
        let Some(session) = self.sessions.resolve(&token)? else {
            return Ok(None);
        };
        Ok(self.users.fetch(session.user_id)?.map(|user| Actor {
            id: user.id,
            role: user.role,
        }))
    }
}

/// Error raised by the identity service.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("an account with this email already exists")]
    DuplicateEmail,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("account is registered under a different role")]
    RoleMismatch,
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("credential hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
