use std::sync::Arc;

use super::domain::{LabourerProfile, ProfileDraft};
use super::repository::ProfileRepository;
use crate::marketplace::identity::{Actor, UserId, UserRole};
use crate::marketplace::store::RepositoryError;

/// Profile upsert and lookup.
pub struct ProfileService<P> {
    profiles: Arc<P>,
}

impl<P> ProfileService<P>
where
    P: ProfileRepository + 'static,
{
    pub fn new(profiles: Arc<P>) -> Self {
        Self { profiles }
    }

    /// Create or replace the actor's own profile. Counters survive the
    /// rewrite; everything else comes from the draft.
    pub fn upsert_profile(
        &self,
        actor: Actor,
        draft: ProfileDraft,
    ) -> Result<LabourerProfile, ProfileError> {
        if actor.role != UserRole::Labourer {
            return Err(ProfileError::Forbidden);
        }

        let existing = self.profiles.fetch(actor.id)?;
        let (rating, completed_jobs) = existing
            .map(|profile| (profile.rating, profile.completed_jobs))
            .unwrap_or((0.0, 0));

        let stored = self.profiles.upsert(LabourerProfile {
            user_id: actor.id,
            skills: draft.skills,
            experience_years: draft.experience_years,
            hourly_rate: draft.hourly_rate,
            location: draft.location,
            phone: draft.phone,
            languages: draft.languages,
            bio: draft.bio,
            rating,
            completed_jobs,
            availability: draft.availability,
        })?;
        Ok(stored)
    }

    /// Open read; farmers browse labourer profiles.
    pub fn profile(&self, labourer: UserId) -> Result<Option<LabourerProfile>, ProfileError> {
        Ok(self.profiles.fetch(labourer)?)
    }
}

/// Error raised by the profile service.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("only labourers maintain a work profile")]
    Forbidden,
    #[error("profile not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
