use super::domain::LabourerProfile;
use crate::marketplace::identity::UserId;
use crate::marketplace::store::RepositoryError;

/// Storage abstraction for labourer profiles. `upsert` replaces any
/// existing profile for the same user id.
pub trait ProfileRepository: Send + Sync {
    fn upsert(&self, profile: LabourerProfile) -> Result<LabourerProfile, RepositoryError>;
    fn fetch(&self, user: UserId) -> Result<Option<LabourerProfile>, RepositoryError>;
}
