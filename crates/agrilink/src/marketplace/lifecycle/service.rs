use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::domain::{
    ApplicationDraft, ApplicationId, ApplicationRequest, BookingDraft, BookingId, BookingRequest,
    DecisionOutcome, EquipmentBooking, JobApplication, OwnerApplicationView, OwnerBookingView,
    RequestStatus, RequesterApplicationView, RequesterBookingView,
};
use super::repository::{
    ApplicationRepository, BookingRepository, JobSummary, ResourceDirectory, TransitionError,
};
use crate::marketplace::identity::{Actor, UserRole};
use crate::marketplace::listings::{JobId, JobStatus};
use crate::marketplace::store::RepositoryError;

/// The request state machine for both resource kinds.
///
/// Creation resolves the counterpart owner; a decision verifies the actor
/// against that owner and then performs the atomic PENDING-to-terminal
/// write. Query methods produce the role-specific joined views.
pub struct LifecycleService<B, A, D> {
    bookings: Arc<B>,
    applications: Arc<A>,
    directory: Arc<D>,
}

impl<B, A, D> LifecycleService<B, A, D>
where
    B: BookingRepository + 'static,
    A: ApplicationRepository + 'static,
    D: ResourceDirectory + 'static,
{
    pub fn new(bookings: Arc<B>, applications: Arc<A>, directory: Arc<D>) -> Self {
        Self {
            bookings,
            applications,
            directory,
        }
    }

    /// Open a booking request against a listing. The seller id is captured
    /// from the listing's owner at this moment.
    pub fn request_booking(
        &self,
        actor: Actor,
        request: BookingRequest,
    ) -> Result<EquipmentBooking, LifecycleError> {
        require_role(actor, UserRole::Farmer)?;
        let listing = self
            .directory
            .equipment_summary(request.equipment_id)?
            .ok_or(LifecycleError::ResourceNotFound)?;

        let booking = self.bookings.insert(BookingDraft {
            equipment_id: listing.id,
            farmer_id: actor.id,
            seller_id: listing.owner_id,
            slot: request.slot,
            price: request.price,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        })?;

        debug!(booking = %booking.id, farmer = %actor.id, seller = %booking.seller_id, "booking requested");
        Ok(booking)
    }

    /// Apply to an open job. A CLOSED or unknown job is not applicable; a
    /// second PENDING application for the same job is a duplicate.
    pub fn request_application(
        &self,
        actor: Actor,
        request: ApplicationRequest,
    ) -> Result<JobApplication, LifecycleError> {
        require_role(actor, UserRole::Labourer)?;
        let job = self
            .directory
            .job_summary(request.job_id)?
            .ok_or(LifecycleError::ResourceNotFound)?;
        if job.status != JobStatus::Open {
            return Err(LifecycleError::ResourceNotFound);
        }

        let application = self
            .applications
            .insert(ApplicationDraft {
                job_id: job.id,
                labourer_id: actor.id,
                status: RequestStatus::Pending,
                message: request.message,
                created_at: Utc::now(),
            })
            .map_err(|err| match err {
                RepositoryError::Conflict => LifecycleError::DuplicateApplication,
                other => LifecycleError::Repository(other),
            })?;

        debug!(application = %application.id, labourer = %actor.id, job = %job.id, "application submitted");
        Ok(application)
    }

    /// Decide a pending booking. Only the seller who owns the listing may
    /// act, and only while the booking is PENDING.
    pub fn decide_booking(
        &self,
        actor: Actor,
        id: BookingId,
        outcome: DecisionOutcome,
    ) -> Result<EquipmentBooking, LifecycleError> {
        let booking = self
            .bookings
            .fetch(id)?
            .ok_or(LifecycleError::ResourceNotFound)?;
        if booking.seller_id != actor.id {
            return Err(LifecycleError::Forbidden);
        }

        let decided = self.bookings.transition(id, outcome.as_status())?;
        debug!(booking = %decided.id, seller = %actor.id, status = decided.status.label(), "booking decided");
        Ok(decided)
    }

    /// Decide a pending application. The owner is the farmer on the job the
    /// application points at, not a field of the application itself.
    pub fn decide_application(
        &self,
        actor: Actor,
        id: ApplicationId,
        outcome: DecisionOutcome,
    ) -> Result<JobApplication, LifecycleError> {
        let application = self
            .applications
            .fetch(id)?
            .ok_or(LifecycleError::ResourceNotFound)?;
        let job = self
            .directory
            .job_summary(application.job_id)?
            .ok_or(LifecycleError::ResourceNotFound)?;
        if job.farmer_id != actor.id {
            return Err(LifecycleError::Forbidden);
        }

        let decided = self.applications.transition(id, outcome.as_status())?;
        debug!(application = %decided.id, farmer = %actor.id, status = decided.status.label(), "application decided");
        Ok(decided)
    }

    /// The seller's incoming booking queue, joined for display.
    pub fn bookings_for_owner(
        &self,
        actor: Actor,
    ) -> Result<Vec<OwnerBookingView>, LifecycleError> {
        require_role(actor, UserRole::Seller)?;
        let bookings = self.bookings.for_seller(actor.id)?;
        bookings
            .into_iter()
            .map(|booking| self.owner_booking_view(booking))
            .collect()
    }

    /// The farmer's own booking requests, joined for display.
    pub fn bookings_for_requester(
        &self,
        actor: Actor,
    ) -> Result<Vec<RequesterBookingView>, LifecycleError> {
        require_role(actor, UserRole::Farmer)?;
        let bookings = self.bookings.for_farmer(actor.id)?;
        bookings
            .into_iter()
            .map(|booking| {
                let equipment_name = self
                    .directory
                    .equipment_summary(booking.equipment_id)?
                    .map(|listing| listing.name)
                    .unwrap_or_default();
                Ok(RequesterBookingView {
                    id: booking.id,
                    equipment_id: booking.equipment_id,
                    equipment_name,
                    seller_id: booking.seller_id,
                    slot: booking.slot,
                    price: booking.price,
                    status: booking.status,
                    created_at: booking.created_at,
                })
            })
            .collect()
    }

    /// The farmer's incoming applications across all of their jobs.
    pub fn applications_for_owner(
        &self,
        actor: Actor,
    ) -> Result<Vec<OwnerApplicationView>, LifecycleError> {
        require_role(actor, UserRole::Farmer)?;
        let mut views = Vec::new();
        for job in self.directory.jobs_owned_by(actor.id)? {
            for application in self.applications.for_job(job.id)? {
                views.push(self.owner_application_view(application, &job)?);
            }
        }
        Ok(views)
    }

    /// Incoming applications for one job, with the ownership check.
    pub fn applications_for_job(
        &self,
        actor: Actor,
        job_id: JobId,
    ) -> Result<Vec<OwnerApplicationView>, LifecycleError> {
        require_role(actor, UserRole::Farmer)?;
        let job = self
            .directory
            .job_summary(job_id)?
            .ok_or(LifecycleError::ResourceNotFound)?;
        if job.farmer_id != actor.id {
            return Err(LifecycleError::Forbidden);
        }

        self.applications
            .for_job(job.id)?
            .into_iter()
            .map(|application| self.owner_application_view(application, &job))
            .collect()
    }

    /// The labourer's own applications, joined with job terms.
    pub fn applications_for_requester(
        &self,
        actor: Actor,
    ) -> Result<Vec<RequesterApplicationView>, LifecycleError> {
        require_role(actor, UserRole::Labourer)?;
        let applications = self.applications.for_labourer(actor.id)?;
        applications
            .into_iter()
            .map(|application| {
                let job = self.directory.job_summary(application.job_id)?;
                let (job_title, wage, skill_required, location) = match job {
                    Some(job) => (job.title, job.wage, job.skill_required, job.location),
                    None => (String::new(), 0.0, String::new(), String::new()),
                };
                Ok(RequesterApplicationView {
                    id: application.id,
                    job_id: application.job_id,
                    job_title,
                    wage,
                    skill_required,
                    location,
                    message: application.message,
                    status: application.status,
                    created_at: application.created_at,
                })
            })
            .collect()
    }

    fn owner_booking_view(
        &self,
        booking: EquipmentBooking,
    ) -> Result<OwnerBookingView, LifecycleError> {
        let equipment_name = self
            .directory
            .equipment_summary(booking.equipment_id)?
            .map(|listing| listing.name)
            .unwrap_or_default();
        let farmer = self.directory.user_contact(booking.farmer_id)?;
        let (farmer_name, farmer_email) = match farmer {
            Some(contact) => (contact.name, contact.email),
            None => (String::new(), String::new()),
        };
        Ok(OwnerBookingView {
            id: booking.id,
            equipment_id: booking.equipment_id,
            equipment_name,
            farmer_id: booking.farmer_id,
            farmer_name,
            farmer_email,
            slot: booking.slot,
            price: booking.price,
            status: booking.status,
            created_at: booking.created_at,
        })
    }

    fn owner_application_view(
        &self,
        application: JobApplication,
        job: &JobSummary,
    ) -> Result<OwnerApplicationView, LifecycleError> {
        let labourer = self.directory.user_contact(application.labourer_id)?;
        let (labourer_name, labourer_email) = match labourer {
            Some(contact) => (contact.name, contact.email),
            None => (String::new(), String::new()),
        };
        Ok(OwnerApplicationView {
            id: application.id,
            job_id: application.job_id,
            job_title: job.title.clone(),
            labourer_id: application.labourer_id,
            labourer_name,
            labourer_email,
            message: application.message,
            status: application.status,
            created_at: application.created_at,
        })
    }
}

fn require_role(actor: Actor, role: UserRole) -> Result<(), LifecycleError> {
    if actor.role == role {
        Ok(())
    } else {
        Err(LifecycleError::Forbidden)
    }
}

/// Error raised by the lifecycle engine.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("resource not found")]
    ResourceNotFound,
    #[error("only the resource owner may act on this request")]
    Forbidden,
    #[error("request is already {}", .current.label())]
    InvalidTransition { current: RequestStatus },
    #[error("a pending application for this job already exists")]
    DuplicateApplication,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<TransitionError> for LifecycleError {
    fn from(value: TransitionError) -> Self {
        match value {
            TransitionError::NotFound => LifecycleError::ResourceNotFound,
            TransitionError::AlreadyDecided { current } => {
                LifecycleError::InvalidTransition { current }
            }
            TransitionError::Unavailable(reason) => {
                LifecycleError::Repository(RepositoryError::Unavailable(reason))
            }
        }
    }
}
