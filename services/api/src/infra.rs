use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use agrilink::marketplace::admin::{AuditStore, TableName};
use agrilink::marketplace::identity::{
    NewUserRecord, Session, SessionStore, SessionToken, User, UserId, UserRepository,
};
use agrilink::marketplace::lifecycle::{
    ApplicationDraft, ApplicationId, ApplicationRepository, BookingDraft, BookingId,
    BookingRepository, EquipmentBooking, EquipmentSummary, JobApplication, JobSummary,
    RequestStatus, ResourceDirectory, TransitionError, UserContact,
};
use agrilink::marketplace::listings::{
    Equipment, EquipmentDraft, EquipmentId, EquipmentRepository, EquipmentStatus, JobDraft, JobId,
    JobRepository, JobStatus, LabourJob,
};
use agrilink::marketplace::market::{MarketPrice, MarketPriceId, MarketPriceRepository};
use agrilink::marketplace::profiles::{LabourerProfile, ProfileRepository};
use agrilink::marketplace::store::RepositoryError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

struct Table<T> {
    rows: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// One in-memory store backing every repository trait plus the audit and
/// directory seams, so all areas observe the same data.
#[derive(Default)]
pub(crate) struct MemoryStore {
    users: Mutex<Table<User>>,
    sessions: Mutex<HashMap<String, Session>>,
    equipment: Mutex<Table<Equipment>>,
    jobs: Mutex<Table<LabourJob>>,
    bookings: Mutex<Table<EquipmentBooking>>,
    applications: Mutex<Table<JobApplication>>,
    profiles: Mutex<HashMap<u64, LabourerProfile>>,
    market_prices: Mutex<Table<MarketPrice>>,
}

impl MemoryStore {
    /// Stand-in for the external mandi feed: a handful of static quotes.
    pub(crate) fn seed_market_prices(&self) {
        let mut table = self.market_prices.lock().expect("market mutex poisoned");
        for (crop, price, unit, location) in [
            ("Wheat", 2350.0, "quintal", "Pune APMC"),
            ("Onion", 1800.0, "quintal", "Lasalgaon"),
            ("Soybean", 4600.0, "quintal", "Latur"),
            ("Cotton", 7100.0, "quintal", "Akola"),
        ] {
            let id = table.allocate();
            table.rows.insert(
                id,
                MarketPrice {
                    id: MarketPriceId(id),
                    crop_name: crop.to_string(),
                    price,
                    unit: unit.to_string(),
                    market_location: location.to_string(),
                    updated_at: Utc::now(),
                },
            );
        }
    }
}

impl UserRepository for MemoryStore {
    fn insert(&self, record: NewUserRecord) -> Result<User, RepositoryError> {
        let mut table = self.users.lock().expect("user mutex poisoned");
        let clash = table
            .rows
            .values()
            .any(|user| user.email.eq_ignore_ascii_case(&record.email));
        if clash {
            return Err(RepositoryError::Conflict);
        }
        let id = table.allocate();
        let user = User {
            id: UserId(id),
            name: record.name,
            email: record.email,
            password_hash: record.password_hash,
            role: record.role,
            created_at: record.created_at,
        };
        table.rows.insert(id, user.clone());
        Ok(user)
    }

    fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let table = self.users.lock().expect("user mutex poisoned");
        Ok(table.rows.get(&id.0).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let table = self.users.lock().expect("user mutex poisoned");
        Ok(table
            .rows
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

impl SessionStore for MemoryStore {
    fn insert(&self, session: Session) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.lock().expect("session mutex poisoned");
        sessions.insert(session.token.0.clone(), session);
        Ok(())
    }

    fn resolve(&self, token: &SessionToken) -> Result<Option<Session>, RepositoryError> {
        let sessions = self.sessions.lock().expect("session mutex poisoned");
        Ok(sessions.get(&token.0).cloned())
    }

    fn remove(&self, token: &SessionToken) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.lock().expect("session mutex poisoned");
        sessions.remove(&token.0);
        Ok(())
    }
}

impl EquipmentRepository for MemoryStore {
    fn insert(&self, draft: EquipmentDraft) -> Result<Equipment, RepositoryError> {
        let mut table = self.equipment.lock().expect("equipment mutex poisoned");
        let id = table.allocate();
        let listing = Equipment {
            id: EquipmentId(id),
            name: draft.name,
            category: draft.category,
            description: draft.description,
            price: draft.price,
            unit: draft.unit,
            owner_id: draft.owner_id,
            image_url: draft.image_url,
            availability: draft.availability,
            rating: draft.rating,
            bookings: draft.bookings,
            status: draft.status,
            created_at: draft.created_at,
        };
        table.rows.insert(id, listing.clone());
        Ok(listing)
    }

    fn fetch(&self, id: EquipmentId) -> Result<Option<Equipment>, RepositoryError> {
        let table = self.equipment.lock().expect("equipment mutex poisoned");
        Ok(table.rows.get(&id.0).cloned())
    }

    fn owned_by(&self, owner: UserId) -> Result<Vec<Equipment>, RepositoryError> {
        let table = self.equipment.lock().expect("equipment mutex poisoned");
        Ok(table
            .rows
            .values()
            .filter(|listing| listing.owner_id == owner)
            .cloned()
            .collect())
    }

    fn discoverable(&self) -> Result<Vec<Equipment>, RepositoryError> {
        let table = self.equipment.lock().expect("equipment mutex poisoned");
        Ok(table
            .rows
            .values()
            .filter(|listing| listing.status != EquipmentStatus::Paused)
            .cloned()
            .collect())
    }

    fn set_status(
        &self,
        id: EquipmentId,
        status: EquipmentStatus,
    ) -> Result<Equipment, RepositoryError> {
        let mut table = self.equipment.lock().expect("equipment mutex poisoned");
        let listing = table.rows.get_mut(&id.0).ok_or(RepositoryError::NotFound)?;
        listing.status = status;
        Ok(listing.clone())
    }
}

impl JobRepository for MemoryStore {
    fn insert(&self, draft: JobDraft) -> Result<LabourJob, RepositoryError> {
        let mut table = self.jobs.lock().expect("job mutex poisoned");
        let id = table.allocate();
        let job = LabourJob {
            id: JobId(id),
            farmer_id: draft.farmer_id,
            title: draft.title,
            skill_required: draft.skill_required,
            description: draft.description,
            wage: draft.wage,
            duration: draft.duration,
            location: draft.location,
            status: draft.status,
            created_at: draft.created_at,
        };
        table.rows.insert(id, job.clone());
        Ok(job)
    }

    fn fetch(&self, id: JobId) -> Result<Option<LabourJob>, RepositoryError> {
        let table = self.jobs.lock().expect("job mutex poisoned");
        Ok(table.rows.get(&id.0).cloned())
    }

    fn open(&self) -> Result<Vec<LabourJob>, RepositoryError> {
        let table = self.jobs.lock().expect("job mutex poisoned");
        Ok(table
            .rows
            .values()
            .filter(|job| job.status == JobStatus::Open)
            .cloned()
            .collect())
    }

    fn posted_by(&self, farmer: UserId) -> Result<Vec<LabourJob>, RepositoryError> {
        let table = self.jobs.lock().expect("job mutex poisoned");
        Ok(table
            .rows
            .values()
            .filter(|job| job.farmer_id == farmer)
            .cloned()
            .collect())
    }

    fn set_status(&self, id: JobId, status: JobStatus) -> Result<LabourJob, RepositoryError> {
        let mut table = self.jobs.lock().expect("job mutex poisoned");
        let job = table.rows.get_mut(&id.0).ok_or(RepositoryError::NotFound)?;
        job.status = status;
        Ok(job.clone())
    }
}

impl BookingRepository for MemoryStore {
    fn insert(&self, draft: BookingDraft) -> Result<EquipmentBooking, RepositoryError> {
        let mut table = self.bookings.lock().expect("booking mutex poisoned");
        let id = table.allocate();
        let booking = EquipmentBooking {
            id: BookingId(id),
            equipment_id: draft.equipment_id,
            farmer_id: draft.farmer_id,
            seller_id: draft.seller_id,
            slot: draft.slot,
            price: draft.price,
            status: draft.status,
            created_at: draft.created_at,
        };
        table.rows.insert(id, booking.clone());
        Ok(booking)
    }

    fn fetch(&self, id: BookingId) -> Result<Option<EquipmentBooking>, RepositoryError> {
        let table = self.bookings.lock().expect("booking mutex poisoned");
        Ok(table.rows.get(&id.0).cloned())
    }

    fn for_seller(&self, seller: UserId) -> Result<Vec<EquipmentBooking>, RepositoryError> {
        let table = self.bookings.lock().expect("booking mutex poisoned");
        Ok(table
            .rows
            .values()
            .filter(|booking| booking.seller_id == seller)
            .cloned()
            .collect())
    }

    fn for_farmer(&self, farmer: UserId) -> Result<Vec<EquipmentBooking>, RepositoryError> {
        let table = self.bookings.lock().expect("booking mutex poisoned");
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
        let mut table = self.bookings.lock().expect("booking mutex poisoned");
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

impl ApplicationRepository for MemoryStore {
    fn insert(&self, draft: ApplicationDraft) -> Result<JobApplication, RepositoryError> {
        let mut table = self.applications.lock().expect("application mutex poisoned");
        let duplicate = table.rows.values().any(|application| {
            application.job_id == draft.job_id
                && application.labourer_id == draft.labourer_id
                && application.status == RequestStatus::Pending
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        let id = table.allocate();
        let application = JobApplication {
            id: ApplicationId(id),
            job_id: draft.job_id,
            labourer_id: draft.labourer_id,
            status: draft.status,
            message: draft.message,
            created_at: draft.created_at,
        };
        table.rows.insert(id, application.clone());
        Ok(application)
    }

    fn fetch(&self, id: ApplicationId) -> Result<Option<JobApplication>, RepositoryError> {
        let table = self.applications.lock().expect("application mutex poisoned");
        Ok(table.rows.get(&id.0).cloned())
    }

    fn for_labourer(&self, labourer: UserId) -> Result<Vec<JobApplication>, RepositoryError> {
        let table = self.applications.lock().expect("application mutex poisoned");
        Ok(table
            .rows
            .values()
            .filter(|application| application.labourer_id == labourer)
            .cloned()
            .collect())
    }

    fn for_job(&self, job: JobId) -> Result<Vec<JobApplication>, RepositoryError> {
        let table = self.applications.lock().expect("application mutex poisoned");
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
        let mut table = self.applications.lock().expect("application mutex poisoned");
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

impl ResourceDirectory for MemoryStore {
    fn equipment_summary(
        &self,
        id: EquipmentId,
    ) -> Result<Option<EquipmentSummary>, RepositoryError> {
        let table = self.equipment.lock().expect("equipment mutex poisoned");
        Ok(table.rows.get(&id.0).map(|listing| EquipmentSummary {
            id: listing.id,
            name: listing.name.clone(),
            owner_id: listing.owner_id,
            status: listing.status,
        }))
    }

    fn job_summary(&self, id: JobId) -> Result<Option<JobSummary>, RepositoryError> {
        let table = self.jobs.lock().expect("job mutex poisoned");
        Ok(table.rows.get(&id.0).map(job_summary))
    }

    fn jobs_owned_by(&self, farmer: UserId) -> Result<Vec<JobSummary>, RepositoryError> {
        let table = self.jobs.lock().expect("job mutex poisoned");
        Ok(table
            .rows
            .values()
            .filter(|job| job.farmer_id == farmer)
            .map(job_summary)
            .collect())
    }

    fn user_contact(&self, id: UserId) -> Result<Option<UserContact>, RepositoryError> {
        let table = self.users.lock().expect("user mutex poisoned");
        Ok(table.rows.get(&id.0).map(|user| UserContact {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }))
    }
}

fn job_summary(job: &LabourJob) -> JobSummary {
    JobSummary {
        id: job.id,
        farmer_id: job.farmer_id,
        title: job.title.clone(),
        wage: job.wage,
        skill_required: job.skill_required.clone(),
        location: job.location.clone(),
        status: job.status,
    }
}

impl ProfileRepository for MemoryStore {
    fn upsert(&self, profile: LabourerProfile) -> Result<LabourerProfile, RepositoryError> {
        let mut profiles = self.profiles.lock().expect("profile mutex poisoned");
        profiles.insert(profile.user_id.0, profile.clone());
        Ok(profile)
    }

    fn fetch(&self, user: UserId) -> Result<Option<LabourerProfile>, RepositoryError> {
        let profiles = self.profiles.lock().expect("profile mutex poisoned");
        Ok(profiles.get(&user.0).cloned())
    }
}

impl MarketPriceRepository for MemoryStore {
    fn list(&self) -> Result<Vec<MarketPrice>, RepositoryError> {
        let table = self.market_prices.lock().expect("market mutex poisoned");
        Ok(table.rows.values().cloned().collect())
    }
}

fn to_rows<T, I>(rows: I) -> Result<Vec<serde_json::Value>, RepositoryError>
where
    T: serde::Serialize,
    I: Iterator<Item = T>,
{
    rows.map(|row| {
        serde_json::to_value(row).map_err(|err| RepositoryError::Unavailable(err.to_string()))
    })
    .collect()
}

impl AuditStore for MemoryStore {
    fn rows(&self, table: TableName) -> Result<Vec<serde_json::Value>, RepositoryError> {
        match table {
            // User rows are rebuilt by hand so the credential hash stays out
            // of the dump.
            TableName::Users => {
                let users = self.users.lock().expect("user mutex poisoned");
                Ok(users
                    .rows
                    .values()
                    .map(|user| {
                        json!({
                            "id": user.id,
                            "name": user.name,
                            "email": user.email,
                            "role": user.role,
                            "created_at": user.created_at,
                        })
                    })
                    .collect())
            }
            TableName::Equipment => {
                let table = self.equipment.lock().expect("equipment mutex poisoned");
                to_rows(table.rows.values())
            }
            TableName::LabourJobs => {
                let table = self.jobs.lock().expect("job mutex poisoned");
                to_rows(table.rows.values())
            }
            TableName::JobApplications => {
                let table = self.applications.lock().expect("application mutex poisoned");
                to_rows(table.rows.values())
            }
            TableName::EquipmentBookings => {
                let table = self.bookings.lock().expect("booking mutex poisoned");
                to_rows(table.rows.values())
            }
            TableName::LabourerProfiles => {
                let profiles = self.profiles.lock().expect("profile mutex poisoned");
                to_rows(profiles.values())
            }
            TableName::MarketPrices => {
                let table = self.market_prices.lock().expect("market mutex poisoned");
                to_rows(table.rows.values())
            }
        }
    }

    fn delete(&self, table: TableName, id: u64) -> Result<(), RepositoryError> {
        let removed = match table {
            TableName::Users => self
                .users
                .lock()
                .expect("user mutex poisoned")
                .rows
                .remove(&id)
                .is_some(),
            TableName::Equipment => self
                .equipment
                .lock()
                .expect("equipment mutex poisoned")
                .rows
                .remove(&id)
                .is_some(),
            TableName::LabourJobs => self
                .jobs
                .lock()
                .expect("job mutex poisoned")
                .rows
                .remove(&id)
                .is_some(),
            TableName::JobApplications => self
                .applications
                .lock()
                .expect("application mutex poisoned")
                .rows
                .remove(&id)
                .is_some(),
            TableName::EquipmentBookings => self
                .bookings
                .lock()
                .expect("booking mutex poisoned")
                .rows
                .remove(&id)
                .is_some(),
            TableName::LabourerProfiles => self
                .profiles
                .lock()
                .expect("profile mutex poisoned")
                .remove(&id)
                .is_some(),
            TableName::MarketPrices => self
                .market_prices
                .lock()
                .expect("market mutex poisoned")
                .rows
                .remove(&id)
                .is_some(),
        };
        if removed {
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}
