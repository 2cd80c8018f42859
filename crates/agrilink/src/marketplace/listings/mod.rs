//! Seller equipment listings and farmer labour jobs.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    Equipment, EquipmentDraft, EquipmentId, EquipmentStatus, JobDraft, JobId, JobStatus,
    LabourJob, ListingCategory, NewEquipment, NewLabourJob,
};
pub use repository::{EquipmentRepository, JobRepository};
pub use router::{listings_router, ListingsRouterState};
pub use service::{ListingError, ListingService};
