use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::domain::{
    Equipment, EquipmentDraft, EquipmentId, EquipmentStatus, JobDraft, JobId, JobStatus, LabourJob,
    NewEquipment, NewLabourJob,
};
use super::repository::{EquipmentRepository, JobRepository};
use crate::marketplace::identity::{Actor, UserRole};
use crate::marketplace::store::RepositoryError;

/// Owner-scoped CRUD for equipment listings and labour jobs.
pub struct ListingService<E, J> {
    equipment: Arc<E>,
    jobs: Arc<J>,
}

impl<E, J> ListingService<E, J>
where
    E: EquipmentRepository + 'static,
    J: JobRepository + 'static,
{
    pub fn new(equipment: Arc<E>, jobs: Arc<J>) -> Self {
        Self { equipment, jobs }
    }

    /// Create a listing with server-side defaults (Available, zero rating
    /// and bookings).
    pub fn create_equipment(
        &self,
        actor: Actor,
        listing: NewEquipment,
    ) -> Result<Equipment, ListingError> {
        require_role(actor, UserRole::Seller)?;
        let name = listing.name.trim();
        if name.is_empty() {
            return Err(ListingError::Validation("name is required".to_string()));
        }

        let stored = self.equipment.insert(EquipmentDraft {
            name: name.to_string(),
            category: listing.category,
            description: listing.description,
            price: listing.price,
            unit: listing.unit,
            owner_id: actor.id,
            image_url: listing.image_url,
            availability: listing.availability,
            rating: 0.0,
            bookings: 0,
            status: EquipmentStatus::Available,
            created_at: Utc::now(),
        })?;

        debug!(listing = %stored.id, owner = %actor.id, "equipment listed");
        Ok(stored)
    }

    pub fn equipment_by_owner(&self, actor: Actor) -> Result<Vec<Equipment>, ListingError> {
        require_role(actor, UserRole::Seller)?;
        Ok(self.equipment.owned_by(actor.id)?)
    }

    /// Farmer discovery; Paused listings never appear here.
    pub fn available_equipment(&self) -> Result<Vec<Equipment>, ListingError> {
        Ok(self.equipment.discoverable()?)
    }

    /// Owner toggle between Available and Paused. Low Stock is not an owner
    /// action; it is reserved for stock-driven automation.
    pub fn set_equipment_status(
        &self,
        actor: Actor,
        id: EquipmentId,
        status: EquipmentStatus,
    ) -> Result<Equipment, ListingError> {
        require_role(actor, UserRole::Seller)?;
        if status == EquipmentStatus::LowStock {
            return Err(ListingError::Validation(
                "status must be Available or Paused".to_string(),
            ));
        }

        let listing = self.equipment.fetch(id)?.ok_or(ListingError::NotFound)?;
        if listing.owner_id != actor.id {
            return Err(ListingError::Forbidden);
        }

        Ok(self.equipment.set_status(id, status)?)
    }

    /// Post a labour job; defaults to OPEN.
    pub fn post_job(&self, actor: Actor, job: NewLabourJob) -> Result<LabourJob, ListingError> {
        require_role(actor, UserRole::Farmer)?;
        let title = job.title.trim();
        if title.is_empty() {
            return Err(ListingError::Validation("title is required".to_string()));
        }
        let skill = job.skill_required.trim();
        if skill.is_empty() {
            return Err(ListingError::Validation(
                "skill_required is required".to_string(),
            ));
        }

        let stored = self.jobs.insert(JobDraft {
            farmer_id: actor.id,
            title: title.to_string(),
            skill_required: skill.to_string(),
            description: job.description,
            wage: job.wage,
            duration: job.duration,
            location: job.location,
            status: JobStatus::Open,
            created_at: Utc::now(),
        })?;

        debug!(job = %stored.id, farmer = %actor.id, "labour job posted");
        Ok(stored)
    }

    /// Labourer discovery; CLOSED jobs never appear here.
    pub fn open_jobs(&self) -> Result<Vec<LabourJob>, ListingError> {
        Ok(self.jobs.open()?)
    }

    pub fn jobs_by_farmer(&self, actor: Actor) -> Result<Vec<LabourJob>, ListingError> {
        require_role(actor, UserRole::Farmer)?;
        Ok(self.jobs.posted_by(actor.id)?)
    }

    /// Owner toggle between OPEN and CLOSED.
    pub fn set_job_status(
        &self,
        actor: Actor,
        id: JobId,
        status: JobStatus,
    ) -> Result<LabourJob, ListingError> {
        require_role(actor, UserRole::Farmer)?;
        let job = self.jobs.fetch(id)?.ok_or(ListingError::NotFound)?;
        if job.farmer_id != actor.id {
            return Err(ListingError::Forbidden);
        }
        Ok(self.jobs.set_status(id, status)?)
    }
}

fn require_role(actor: Actor, role: UserRole) -> Result<(), ListingError> {
    if actor.role == role {
        Ok(())
    } else {
        Err(ListingError::Forbidden)
    }
}

/// Error raised by the listing service.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("resource not found")]
    NotFound,
    #[error("actor does not own this resource")]
    Forbidden,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
