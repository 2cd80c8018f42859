//! Labourer work profiles, upserted by their owner.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{LabourerProfile, ProfileDraft};
pub use repository::ProfileRepository;
pub use router::{profiles_router, ProfilesRouterState};
pub use service::{ProfileError, ProfileService};
