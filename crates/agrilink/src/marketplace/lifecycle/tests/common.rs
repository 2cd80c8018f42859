use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::marketplace::identity::{Actor, UserId, UserRole};
use crate::marketplace::lifecycle::domain::{
    ApplicationDraft, ApplicationId, BookingDraft, BookingId, EquipmentBooking, JobApplication,
    RequestStatus,
};
use crate::marketplace::lifecycle::repository::{
    ApplicationRepository, BookingRepository, EquipmentSummary, JobSummary, ResourceDirectory,
    TransitionError, UserContact,
};
use crate::marketplace::lifecycle::LifecycleService;
use crate::marketplace::listings::{EquipmentId, EquipmentStatus, JobId, JobStatus};
use crate::marketplace::store::RepositoryError;

pub(super) const FARMER: Actor = Actor {
    id: UserId(1),
    role: UserRole::Farmer,
};
pub(super) const SELLER: Actor = Actor {
    id: UserId(2),
    role: UserRole::Seller,
};
pub(super) const LABOURER: Actor = Actor {
    id: UserId(3),
    role: UserRole::Labourer,
};
pub(super) const OTHER_SELLER: Actor = Actor {
    id: UserId(4),
    role: UserRole::Seller,
};
pub(super) const OTHER_FARMER: Actor = Actor {
    id: UserId(5),
    role: UserRole::Farmer,
};

#[derive(Default)]
struct BookingTable {
    rows: HashMap<u64, EquipmentBooking>,
    next_id: u64,
}

#[derive(Default, Clone)]
pub(super) struct MemoryBookings {
    table: Arc<Mutex<BookingTable>>,
}

impl BookingRepository for MemoryBookings {
    fn insert(&self, draft: BookingDraft) -> Result<EquipmentBooking, RepositoryError> {
        let mut table = self.table.lock().expect("booking mutex poisoned");
        table.next_id += 1;
        let booking = EquipmentBooking {
            id: BookingId(table.next_id),
            equipment_id: draft.equipment_id,
            farmer_id: draft.farmer_id,
            seller_id: draft.seller_id,
            slot: draft.slot,
            price: draft.price,
            status: draft.status,
            created_at: draft.created_at,
        };
        table.rows.insert(booking.id.0, booking.clone());
        Ok(booking)
    }

    fn fetch(&self, id: BookingId) -> Result<Option<EquipmentBooking>, RepositoryError> {
        let table = self.table.lock().expect("booking mutex poisoned");
        Ok(table.rows.get(&id.0).cloned())
    }

    fn for_seller(&self, seller: UserId) -> Result<Vec<EquipmentBooking>, RepositoryError> {
        let table = self.table.lock().expect("booking mutex poisoned");
        Ok(table
            .rows
            .values()
            .filter(|booking| booking.seller_id == seller)
            .cloned()
            .collect())
    }

    fn for_farmer(&self, farmer: UserId) -> Result<Vec<EquipmentBooking>, RepositoryError> {
        let table = self.table.lock().expect("booking mutex poisoned");
        Ok(table
            .rows
            .values()
            .filter(|booking| booking.farmer_id == farmer)
            .cloned()
            .collect())
    }

    fn transition(
        &self,
        id: BookingId,
        to: RequestStatus,
    ) -> Result<EquipmentBooking, TransitionError> {
        let mut table = self.table.lock().expect("booking mutex poisoned");
        let booking = table.rows.get_mut(&id.0).ok_or(TransitionError::NotFound)?;
        if booking.status != RequestStatus::Pending {
            return Err(TransitionError::AlreadyDecided {
                current: booking.status,
            });
        }
        booking.status = to;
        Ok(booking.clone())
    }
}

#[derive(Default)]
struct ApplicationTable {
    rows: HashMap<u64, JobApplication>,
    next_id: u64,
}

#[derive(Default, Clone)]
pub(super) struct MemoryApplications {
    table: Arc<Mutex<ApplicationTable>>,
}

impl ApplicationRepository for MemoryApplications {
    fn insert(&self, draft: ApplicationDraft) -> Result<JobApplication, RepositoryError> {
        let mut table = self.table.lock().expect("application mutex poisoned");
        let duplicate = table.rows.values().any(|application| {
            application.job_id == draft.job_id
                && application.labourer_id == draft.labourer_id
                && application.status == RequestStatus::Pending
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        table.next_id += 1;
        let application = JobApplication {
            id: ApplicationId(table.next_id),
            job_id: draft.job_id,
            labourer_id: draft.labourer_id,
            status: draft.status,
            message: draft.message,
            created_at: draft.created_at,
        };
        table.rows.insert(application.id.0, application.clone());
        Ok(application)
    }

    fn fetch(&self, id: ApplicationId) -> Result<Option<JobApplication>, RepositoryError> {
        let table = self.table.lock().expect("application mutex poisoned");
        Ok(table.rows.get(&id.0).cloned())
    }

    fn for_labourer(&self, labourer: UserId) -> Result<Vec<JobApplication>, RepositoryError> {
        let table = self.table.lock().expect("application mutex poisoned");
        Ok(table
            .rows
            .values()
            .filter(|application| application.labourer_id == labourer)
            .cloned()
            .collect())
    }

    fn for_job(&self, job: JobId) -> Result<Vec<JobApplication>, RepositoryError> {
        let table = self.table.lock().expect("application mutex poisoned");
        Ok(table
            .rows
            .values()
            .filter(|application| application.job_id == job)
            .cloned()
            .collect())
    }

    fn transition(
        &self,
        id: ApplicationId,
        to: RequestStatus,
    ) -> Result<JobApplication, TransitionError> {
        let mut table = self.table.lock().expect("application mutex poisoned");
        let application = table.rows.get_mut(&id.0).ok_or(TransitionError::NotFound)?;
        if application.status != RequestStatus::Pending {
            return Err(TransitionError::AlreadyDecided {
                current: application.status,
            });
        }
        application.status = to;
        Ok(application.clone())
    }
}

#[derive(Default)]
struct DirectoryTables {
    equipment: HashMap<u64, EquipmentSummary>,
    jobs: HashMap<u64, JobSummary>,
    users: HashMap<u64, UserContact>,
}

#[derive(Default, Clone)]
pub(super) struct StaticDirectory {
    tables: Arc<Mutex<DirectoryTables>>,
}

impl StaticDirectory {
    pub(super) fn add_equipment(&self, summary: EquipmentSummary) {
        let mut tables = self.tables.lock().expect("directory mutex poisoned");
        tables.equipment.insert(summary.id.0, summary);
    }

    pub(super) fn remove_equipment(&self, id: EquipmentId) {
        let mut tables = self.tables.lock().expect("directory mutex poisoned");
        tables.equipment.remove(&id.0);
    }

    pub(super) fn add_job(&self, summary: JobSummary) {
        let mut tables = self.tables.lock().expect("directory mutex poisoned");
        tables.jobs.insert(summary.id.0, summary);
    }

    pub(super) fn add_user(&self, contact: UserContact) {
        let mut tables = self.tables.lock().expect("directory mutex poisoned");
        tables.users.insert(contact.id.0, contact);
    }
}

impl ResourceDirectory for StaticDirectory {
    fn equipment_summary(
        &self,
        id: EquipmentId,
    ) -> Result<Option<EquipmentSummary>, RepositoryError> {
        let tables = self.tables.lock().expect("directory mutex poisoned");
        Ok(tables.equipment.get(&id.0).cloned())
    }

    fn job_summary(&self, id: JobId) -> Result<Option<JobSummary>, RepositoryError> {
        let tables = self.tables.lock().expect("directory mutex poisoned");
        Ok(tables.jobs.get(&id.0).cloned())
    }

    fn jobs_owned_by(&self, farmer: UserId) -> Result<Vec<JobSummary>, RepositoryError> {
        let tables = self.tables.lock().expect("directory mutex poisoned");
        let mut jobs: Vec<JobSummary> = tables
            .jobs
            .values()
            .filter(|job| job.farmer_id == farmer)
            .cloned()
            .collect();
        jobs.sort_by_key(|job| job.id);
        Ok(jobs)
    }

    fn user_contact(&self, id: UserId) -> Result<Option<UserContact>, RepositoryError> {
        let tables = self.tables.lock().expect("directory mutex poisoned");
        Ok(tables.users.get(&id.0).cloned())
    }
}

pub(super) fn tractor_summary() -> EquipmentSummary {
    EquipmentSummary {
        id: EquipmentId(10),
        name: "Heavy-duty tractor".to_string(),
        owner_id: SELLER.id,
        status: EquipmentStatus::Available,
    }
}

pub(super) fn harvest_job() -> JobSummary {
    JobSummary {
        id: JobId(20),
        farmer_id: FARMER.id,
        title: "Wheat harvest help".to_string(),
        wage: 500.0,
        skill_required: "Harvesting".to_string(),
        location: "Nashik".to_string(),
        status: JobStatus::Open,
    }
}

pub(super) fn closed_job() -> JobSummary {
    JobSummary {
        id: JobId(21),
        farmer_id: FARMER.id,
        title: "Finished sowing work".to_string(),
        wage: 350.0,
        skill_required: "Sowing".to_string(),
        location: "Pune".to_string(),
        status: JobStatus::Closed,
    }
}

pub(super) fn build_service() -> (
    LifecycleService<MemoryBookings, MemoryApplications, StaticDirectory>,
    MemoryBookings,
    MemoryApplications,
    StaticDirectory,
) {
    let bookings = MemoryBookings::default();
    let applications = MemoryApplications::default();
    let directory = StaticDirectory::default();
    directory.add_equipment(tractor_summary());
    directory.add_job(harvest_job());
    directory.add_job(closed_job());
    directory.add_user(UserContact {
        id: FARMER.id,
        name: "Asha Pawar".to_string(),
        email: "asha@example.com".to_string(),
    });
    directory.add_user(UserContact {
        id: LABOURER.id,
        name: "Ravi Jadhav".to_string(),
        email: "ravi@example.com".to_string(),
    });

    let service = LifecycleService::new(
        Arc::new(bookings.clone()),
        Arc::new(applications.clone()),
        Arc::new(directory.clone()),
    );
    (service, bookings, applications, directory)
}

/// Booking repository whose writes always fail, for error-path tests.
pub(super) struct UnavailableBookings;

impl BookingRepository for UnavailableBookings {
    fn insert(&self, _draft: BookingDraft) -> Result<EquipmentBooking, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: BookingId) -> Result<Option<EquipmentBooking>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn for_seller(&self, _seller: UserId) -> Result<Vec<EquipmentBooking>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn for_farmer(&self, _farmer: UserId) -> Result<Vec<EquipmentBooking>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn transition(
        &self,
        _id: BookingId,
        _to: RequestStatus,
    ) -> Result<EquipmentBooking, TransitionError> {
        Err(TransitionError::Unavailable("store offline".to_string()))
    }
}
