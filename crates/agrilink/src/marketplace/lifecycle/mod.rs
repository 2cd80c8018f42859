//! The booking/application lifecycle engine.
//!
//! Both request kinds share one state machine: PENDING at creation, then a
//! single owner decision moves the record to ACCEPTED or REJECTED, which are
//! terminal. The owner of a request lives on a different entity (the
//! listing's seller, the job's farmer), so authorization resolves through
//! the [`repository::ResourceDirectory`] seam rather than trusting fields on
//! the request itself.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationDraft, ApplicationId, ApplicationRequest, BookingDraft, BookingId, BookingRequest,
    DecisionOutcome, EquipmentBooking, JobApplication, OwnerApplicationView, OwnerBookingView,
    RequestStatus, RequesterApplicationView, RequesterBookingView,
};
pub use repository::{
    ApplicationRepository, BookingRepository, EquipmentSummary, JobSummary, ResourceDirectory,
    TransitionError, UserContact,
};
pub use router::{lifecycle_router, LifecycleRouterState};
pub use service::{LifecycleError, LifecycleService};
