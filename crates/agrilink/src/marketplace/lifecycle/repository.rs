use super::domain::{
    ApplicationDraft, ApplicationId, BookingDraft, BookingId, EquipmentBooking, JobApplication,
    RequestStatus,
};
use crate::marketplace::identity::UserId;
use crate::marketplace::listings::{EquipmentId, EquipmentStatus, JobId, JobStatus};
use crate::marketplace::store::RepositoryError;

/// Failure of the atomic decide write.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("record not found")]
    NotFound,
    #[error("request is already {}", .current.label())]
    AlreadyDecided { current: RequestStatus },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for equipment bookings.
pub trait BookingRepository: Send + Sync {
    fn insert(&self, draft: BookingDraft) -> Result<EquipmentBooking, RepositoryError>;
    fn fetch(&self, id: BookingId) -> Result<Option<EquipmentBooking>, RepositoryError>;
    fn for_seller(&self, seller: UserId) -> Result<Vec<EquipmentBooking>, RepositoryError>;
    fn for_farmer(&self, farmer: UserId) -> Result<Vec<EquipmentBooking>, RepositoryError>;
    /// Move a PENDING booking into a terminal status. The status check and
    /// the write must be one atomic operation: two concurrent calls on the
    /// same id must not both succeed.
    fn transition(
        &self,
        id: BookingId,
        to: RequestStatus,
    ) -> Result<EquipmentBooking, TransitionError>;
}

/// Storage abstraction for job applications.
pub trait ApplicationRepository: Send + Sync {
    /// Insert an application, rejecting a second PENDING application for
    /// the same (job, labourer) pair with [`RepositoryError::Conflict`].
    /// The uniqueness check happens inside the store's lock.
    fn insert(&self, draft: ApplicationDraft) -> Result<JobApplication, RepositoryError>;
    fn fetch(&self, id: ApplicationId) -> Result<Option<JobApplication>, RepositoryError>;
    fn for_labourer(&self, labourer: UserId) -> Result<Vec<JobApplication>, RepositoryError>;
    fn for_job(&self, job: JobId) -> Result<Vec<JobApplication>, RepositoryError>;
    /// Same atomicity contract as [`BookingRepository::transition`].
    fn transition(
        &self,
        id: ApplicationId,
        to: RequestStatus,
    ) -> Result<JobApplication, TransitionError>;
}

/// Listing fields the engine needs: ownership for authorization, the rest
/// for read-side joins.
#[derive(Debug, Clone)]
pub struct EquipmentSummary {
    pub id: EquipmentId,
    pub name: String,
    pub owner_id: UserId,
    pub status: EquipmentStatus,
}

/// Job fields the engine needs.
#[derive(Debug, Clone)]
pub struct JobSummary {
    pub id: JobId,
    pub farmer_id: UserId,
    pub title: String,
    pub wage: f64,
    pub skill_required: String,
    pub location: String,
    pub status: JobStatus,
}

/// Contact fields for joining requester identity into owner queues.
#[derive(Debug, Clone)]
pub struct UserContact {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Read seam into the listings and identity collections. The engine never
/// mutates through this trait.
pub trait ResourceDirectory: Send + Sync {
    fn equipment_summary(
        &self,
        id: EquipmentId,
    ) -> Result<Option<EquipmentSummary>, RepositoryError>;
    fn job_summary(&self, id: JobId) -> Result<Option<JobSummary>, RepositoryError>;
    fn jobs_owned_by(&self, farmer: UserId) -> Result<Vec<JobSummary>, RepositoryError>;
    fn user_contact(&self, id: UserId) -> Result<Option<UserContact>, RepositoryError>;
}
