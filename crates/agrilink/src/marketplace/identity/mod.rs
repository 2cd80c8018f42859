//! Actor identity: registration, login, and opaque session tokens.

pub mod domain;
pub(crate) mod password;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Actor, NewUser, Session, SessionToken, User, UserId, UserRole, UserView};
pub use repository::{NewUserRecord, SessionStore, UserRepository};
pub use router::identity_router;
pub use service::{ActorResolver, IdentityError, IdentityService};
