use super::domain::{
    Equipment, EquipmentDraft, EquipmentId, EquipmentStatus, JobDraft, JobId, JobStatus, LabourJob,
};
use crate::marketplace::identity::UserId;
use crate::marketplace::store::RepositoryError;

/// Storage abstraction for equipment listings.
pub trait EquipmentRepository: Send + Sync {
    fn insert(&self, draft: EquipmentDraft) -> Result<Equipment, RepositoryError>;
    fn fetch(&self, id: EquipmentId) -> Result<Option<Equipment>, RepositoryError>;
    fn owned_by(&self, owner: UserId) -> Result<Vec<Equipment>, RepositoryError>;
    /// Farmer discovery: every listing whose status is not Paused.
    fn discoverable(&self) -> Result<Vec<Equipment>, RepositoryError>;
    fn set_status(
        &self,
        id: EquipmentId,
        status: EquipmentStatus,
    ) -> Result<Equipment, RepositoryError>;
}

/// Storage abstraction for labour jobs.
pub trait JobRepository: Send + Sync {
    fn insert(&self, draft: JobDraft) -> Result<LabourJob, RepositoryError>;
    fn fetch(&self, id: JobId) -> Result<Option<LabourJob>, RepositoryError>;
    /// Labourer discovery: OPEN jobs only.
    fn open(&self) -> Result<Vec<LabourJob>, RepositoryError>;
    fn posted_by(&self, farmer: UserId) -> Result<Vec<LabourJob>, RepositoryError>;
    fn set_status(&self, id: JobId, status: JobStatus) -> Result<LabourJob, RepositoryError>;
}
