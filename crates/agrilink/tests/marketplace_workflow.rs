//! Integration specifications for the marketplace request lifecycle.
//!
//! Scenarios run end-to-end through the public service facades (identity,
//! listings, and the lifecycle engine) against one shared in-memory store,
//! the way the HTTP binary wires them.

mod common {
    use std::collections::{BTreeMap, HashMap};
    use std::sync::{Arc, Mutex};

    use agrilink::marketplace::identity::{
        Actor, NewUser, NewUserRecord, Session, SessionStore, SessionToken, User, UserId,
        UserRepository, UserRole,
    };
    use agrilink::marketplace::lifecycle::{
        ApplicationDraft, ApplicationId, ApplicationRepository, BookingDraft, BookingId,
        BookingRepository, EquipmentBooking, EquipmentSummary, JobApplication, JobSummary,
        RequestStatus, ResourceDirectory, TransitionError, UserContact,
    };
    use agrilink::marketplace::listings::{
        Equipment, EquipmentDraft, EquipmentId, EquipmentRepository, EquipmentStatus, JobDraft,
        JobId, JobRepository, JobStatus, LabourJob,
    };
    use agrilink::marketplace::store::RepositoryError;

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

    /// Test double for the durable store, shared across all repositories.
    #[derive(Default)]
    pub struct MemoryMarket {
        users: Mutex<Table<User>>,
        sessions: Mutex<HashMap<String, Session>>,
        equipment: Mutex<Table<Equipment>>,
        jobs: Mutex<Table<LabourJob>>,
        bookings: Mutex<Table<EquipmentBooking>>,
        applications: Mutex<Table<JobApplication>>,
    }

    impl UserRepository for MemoryMarket {
        fn insert(&self, record: NewUserRecord) -> Result<User, RepositoryError> {
            let mut table = self.users.lock().expect("lock");
            if table
                .rows
                .values()
                .any(|user| user.email.eq_ignore_ascii_case(&record.email))
            {
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
            Ok(self.users.lock().expect("lock").rows.get(&id.0).cloned())
        }

        fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
            Ok(self
                .users
                .lock()
                .expect("lock")
                .rows
                .values()
                .find(|user| user.email.eq_ignore_ascii_case(email))
                .cloned())
        }
    }

    impl SessionStore for MemoryMarket {
        fn insert(&self, session: Session) -> Result<(), RepositoryError> {
            self.sessions
                .lock()
                .expect("lock")
                .insert(session.token.0.clone(), session);
            Ok(())
        }

        fn resolve(&self, token: &SessionToken) -> Result<Option<Session>, RepositoryError> {
            Ok(self.sessions.lock().expect("lock").get(&token.0).cloned())
        }

        fn remove(&self, token: &SessionToken) -> Result<(), RepositoryError> {
            self.sessions.lock().expect("lock").remove(&token.0);
            Ok(())
        }
    }

    impl EquipmentRepository for MemoryMarket {
        fn insert(&self, draft: EquipmentDraft) -> Result<Equipment, RepositoryError> {
            let mut table = self.equipment.lock().expect("lock");
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
            Ok(self.equipment.lock().expect("lock").rows.get(&id.0).cloned())
        }

        fn owned_by(&self, owner: UserId) -> Result<Vec<Equipment>, RepositoryError> {
            Ok(self
                .equipment
                .lock()
                .expect("lock")
                .rows
                .values()
                .filter(|listing| listing.owner_id == owner)
                .cloned()
                .collect())
        }

        fn discoverable(&self) -> Result<Vec<Equipment>, RepositoryError> {
            Ok(self
                .equipment
                .lock()
                .expect("lock")
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
            let mut table = self.equipment.lock().expect("lock");
            let listing = table.rows.get_mut(&id.0).ok_or(RepositoryError::NotFound)?;
            listing.status = status;
            Ok(listing.clone())
        }
    }

    impl JobRepository for MemoryMarket {
        fn insert(&self, draft: JobDraft) -> Result<LabourJob, RepositoryError> {
            let mut table = self.jobs.lock().expect("lock");
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
            Ok(self.jobs.lock().expect("lock").rows.get(&id.0).cloned())
        }

        fn open(&self) -> Result<Vec<LabourJob>, RepositoryError> {
            Ok(self
                .jobs
                .lock()
                .expect("lock")
                .rows
                .values()
                .filter(|job| job.status == JobStatus::Open)
                .cloned()
                .collect())
        }

        fn posted_by(&self, farmer: UserId) -> Result<Vec<LabourJob>, RepositoryError> {
            Ok(self
                .jobs
                .lock()
                .expect("lock")
                .rows
                .values()
                .filter(|job| job.farmer_id == farmer)
                .cloned()
                .collect())
        }

        fn set_status(&self, id: JobId, status: JobStatus) -> Result<LabourJob, RepositoryError> {
            let mut table = self.jobs.lock().expect("lock");
            let job = table.rows.get_mut(&id.0).ok_or(RepositoryError::NotFound)?;
            job.status = status;
            Ok(job.clone())
        }
    }

    impl BookingRepository for MemoryMarket {
        fn insert(&self, draft: BookingDraft) -> Result<EquipmentBooking, RepositoryError> {
            let mut table = self.bookings.lock().expect("lock");
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
            Ok(self.bookings.lock().expect("lock").rows.get(&id.0).cloned())
        }

        fn for_seller(&self, seller: UserId) -> Result<Vec<EquipmentBooking>, RepositoryError> {
            Ok(self
                .bookings
                .lock()
                .expect("lock")
                .rows
                .values()
                .filter(|booking| booking.seller_id == seller)
                .cloned()
                .collect())
        }

        fn for_farmer(&self, farmer: UserId) -> Result<Vec<EquipmentBooking>, RepositoryError> {
            Ok(self
                .bookings
                .lock()
                .expect("lock")
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
            let mut table = self.bookings.lock().expect("lock");
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

    impl ApplicationRepository for MemoryMarket {
        fn insert(&self, draft: ApplicationDraft) -> Result<JobApplication, RepositoryError> {
            let mut table = self.applications.lock().expect("lock");
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
            Ok(self
                .applications
                .lock()
                .expect("lock")
                .rows
                .get(&id.0)
                .cloned())
        }

        fn for_labourer(&self, labourer: UserId) -> Result<Vec<JobApplication>, RepositoryError> {
            Ok(self
                .applications
                .lock()
                .expect("lock")
                .rows
                .values()
                .filter(|application| application.labourer_id == labourer)
                .cloned()
                .collect())
        }

        fn for_job(&self, job: JobId) -> Result<Vec<JobApplication>, RepositoryError> {
            Ok(self
                .applications
                .lock()
                .expect("lock")
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
            let mut table = self.applications.lock().expect("lock");
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

    impl ResourceDirectory for MemoryMarket {
        fn equipment_summary(
            &self,
            id: EquipmentId,
        ) -> Result<Option<EquipmentSummary>, RepositoryError> {
            Ok(self
                .equipment
                .lock()
                .expect("lock")
                .rows
                .get(&id.0)
                .map(|listing| EquipmentSummary {
                    id: listing.id,
                    name: listing.name.clone(),
                    owner_id: listing.owner_id,
                    status: listing.status,
                }))
        }

        fn job_summary(&self, id: JobId) -> Result<Option<JobSummary>, RepositoryError> {
            Ok(self
                .jobs
                .lock()
                .expect("lock")
                .rows
                .get(&id.0)
                .map(summarize))
        }

        fn jobs_owned_by(&self, farmer: UserId) -> Result<Vec<JobSummary>, RepositoryError> {
            Ok(self
                .jobs
                .lock()
                .expect("lock")
                .rows
                .values()
                .filter(|job| job.farmer_id == farmer)
                .map(summarize)
                .collect())
        }

        fn user_contact(&self, id: UserId) -> Result<Option<UserContact>, RepositoryError> {
            Ok(self
                .users
                .lock()
                .expect("lock")
                .rows
                .get(&id.0)
                .map(|user| UserContact {
                    id: user.id,
                    name: user.name.clone(),
                    email: user.email.clone(),
                }))
        }
    }

    fn summarize(job: &LabourJob) -> JobSummary {
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

    pub struct Marketplace {
        pub identity: agrilink::marketplace::identity::IdentityService<MemoryMarket, MemoryMarket>,
        pub listings:
            agrilink::marketplace::listings::ListingService<MemoryMarket, MemoryMarket>,
        pub lifecycle: agrilink::marketplace::lifecycle::LifecycleService<
            MemoryMarket,
            MemoryMarket,
            MemoryMarket,
        >,
    }

    pub fn marketplace() -> Marketplace {
        let store = Arc::new(MemoryMarket::default());
        Marketplace {
            identity: agrilink::marketplace::identity::IdentityService::new(
                store.clone(),
                store.clone(),
            ),
            listings: agrilink::marketplace::listings::ListingService::new(
                store.clone(),
                store.clone(),
            ),
            lifecycle: agrilink::marketplace::lifecycle::LifecycleService::new(
                store.clone(),
                store.clone(),
                store,
            ),
        }
    }

    pub fn signed_up(market: &Marketplace, name: &str, email: &str, role: UserRole) -> Actor {
        let user = market
            .identity
            .register(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password: "pw".to_string(),
                role,
            })
            .expect("registration succeeds");
        Actor {
            id: user.id,
            role: user.role,
        }
    }
}

use common::{marketplace, signed_up};

use agrilink::marketplace::identity::{IdentityError, NewUser, SessionToken, UserRole};
use agrilink::marketplace::lifecycle::{
    ApplicationRequest, BookingRequest, DecisionOutcome, LifecycleError, RequestStatus,
};
use agrilink::marketplace::listings::{
    EquipmentStatus, JobStatus, ListingCategory, NewEquipment, NewLabourJob,
};

fn tractor() -> NewEquipment {
    NewEquipment {
        name: "Heavy-duty tractor".to_string(),
        category: ListingCategory::Equipment,
        description: "55 HP".to_string(),
        price: 1200.0,
        unit: "hr".to_string(),
        image_url: String::new(),
        availability: "Weekdays".to_string(),
    }
}

fn harvest_job() -> NewLabourJob {
    NewLabourJob {
        title: "Wheat harvest help".to_string(),
        skill_required: "Harvesting".to_string(),
        description: String::new(),
        wage: 500.0,
        duration: "4 days".to_string(),
        location: "Nashik".to_string(),
    }
}

#[test]
fn registration_enforces_case_insensitive_email_uniqueness() {
    let market = marketplace();
    signed_up(&market, "Asha", "a@x.com", UserRole::Farmer);

    let err = market
        .identity
        .register(NewUser {
            name: "Asha2".to_string(),
            email: "A@X.com".to_string(),
            password: "pw2".to_string(),
            role: UserRole::Farmer,
        })
        .expect_err("duplicate email rejected");
    assert!(matches!(err, IdentityError::DuplicateEmail));
}

#[test]
fn session_round_trip_and_role_mismatch() {
    let market = marketplace();
    signed_up(&market, "Asha", "asha@example.com", UserRole::Farmer);

    let err = market
        .identity
        .login("asha@example.com", "pw", UserRole::Labourer)
        .expect_err("role mismatch rejected");
    assert!(matches!(err, IdentityError::RoleMismatch));

    let err = market
        .identity
        .login("asha@example.com", "wrong", UserRole::Farmer)
        .expect_err("bad secret rejected");
    assert!(matches!(err, IdentityError::InvalidCredentials));

    let (user, token) = market
        .identity
        .login("asha@example.com", "pw", UserRole::Farmer)
        .expect("login succeeds");
    let current = market
        .identity
        .current_user(&token)
        .expect("lookup works")
        .expect("session resolves");
    assert_eq!(current.id, user.id);

    market.identity.logout(&token).expect("logout works");
    assert!(market
        .identity
        .current_user(&token)
        .expect("lookup works")
        .is_none());

    assert!(market
        .identity
        .current_user(&SessionToken("stale-token".to_string()))
        .expect("lookup works")
        .is_none());
}

#[test]
fn paused_listings_leave_discovery_until_resumed() {
    let market = marketplace();
    let seller = signed_up(&market, "Sunil", "sunil@example.com", UserRole::Seller);

    let listing = market
        .listings
        .create_equipment(seller, tractor())
        .expect("listing created");
    assert_eq!(listing.status, EquipmentStatus::Available);
    assert_eq!(listing.rating, 0.0);
    assert_eq!(listing.bookings, 0);

    market
        .listings
        .set_equipment_status(seller, listing.id, EquipmentStatus::Paused)
        .expect("owner pauses");
    assert!(market
        .listings
        .available_equipment()
        .expect("discovery works")
        .is_empty());

    market
        .listings
        .set_equipment_status(seller, listing.id, EquipmentStatus::Available)
        .expect("owner resumes");
    let discoverable = market
        .listings
        .available_equipment()
        .expect("discovery works");
    assert_eq!(discoverable.len(), 1);
    assert_eq!(discoverable[0].id, listing.id);
}

#[test]
fn closed_jobs_leave_labourer_discovery() {
    let market = marketplace();
    let farmer = signed_up(&market, "Asha", "asha@example.com", UserRole::Farmer);

    let job = market
        .listings
        .post_job(farmer, harvest_job())
        .expect("job posted");
    assert_eq!(job.status, JobStatus::Open);
    assert_eq!(market.listings.open_jobs().expect("discovery works").len(), 1);

    market
        .listings
        .set_job_status(farmer, job.id, JobStatus::Closed)
        .expect("owner closes");
    assert!(market.listings.open_jobs().expect("discovery works").is_empty());
}

#[test]
fn rental_scenario_with_intruding_seller() {
    let market = marketplace();
    let seller = signed_up(&market, "Sunil", "sunil@example.com", UserRole::Seller);
    let other_seller = signed_up(&market, "Vikram", "vikram@example.com", UserRole::Seller);
    let farmer = signed_up(&market, "Asha", "asha@example.com", UserRole::Farmer);

    let listing = market
        .listings
        .create_equipment(seller, tractor())
        .expect("listing created");

    let booking = market
        .lifecycle
        .request_booking(
            farmer,
            BookingRequest {
                equipment_id: listing.id,
                slot: "21 Nov 6AM-2PM".to_string(),
                price: 8800.0,
            },
        )
        .expect("booking created");
    assert_eq!(booking.status, RequestStatus::Pending);
    assert_eq!(booking.seller_id, seller.id);

    let queue = market
        .lifecycle
        .bookings_for_owner(seller)
        .expect("queue loads");
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].equipment_name, "Heavy-duty tractor");
    assert_eq!(queue[0].status, RequestStatus::Pending);

    let err = market
        .lifecycle
        .decide_booking(other_seller, booking.id, DecisionOutcome::Accepted)
        .expect_err("non-owner rejected");
    assert!(matches!(err, LifecycleError::Forbidden));

    let decided = market
        .lifecycle
        .decide_booking(seller, booking.id, DecisionOutcome::Rejected)
        .expect("owner decides");
    assert_eq!(decided.status, RequestStatus::Rejected);

    let err = market
        .lifecycle
        .decide_booking(seller, booking.id, DecisionOutcome::Accepted)
        .expect_err("terminal record locked");
    assert!(matches!(
        err,
        LifecycleError::InvalidTransition {
            current: RequestStatus::Rejected
        }
    ));
}

#[test]
fn labour_scenario_reaches_accepted_with_joined_wage() {
    let market = marketplace();
    let farmer = signed_up(&market, "Asha", "asha@example.com", UserRole::Farmer);
    let labourer = signed_up(&market, "Ravi", "ravi@example.com", UserRole::Labourer);

    let job = market
        .listings
        .post_job(farmer, harvest_job())
        .expect("job posted");

    let application = market
        .lifecycle
        .request_application(
            labourer,
            ApplicationRequest {
                job_id: job.id,
                message: "I have 5 years experience".to_string(),
            },
        )
        .expect("application created");
    assert_eq!(application.status, RequestStatus::Pending);

    market
        .lifecycle
        .decide_application(farmer, application.id, DecisionOutcome::Accepted)
        .expect("farmer accepts");

    let mine = market
        .lifecycle
        .applications_for_requester(labourer)
        .expect("requester view loads");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].status, RequestStatus::Accepted);
    assert_eq!(mine[0].job_title, "Wheat harvest help");
    assert!((mine[0].wage - 500.0).abs() < f64::EPSILON);
}

#[test]
fn closing_a_job_blocks_new_applications() {
    let market = marketplace();
    let farmer = signed_up(&market, "Asha", "asha@example.com", UserRole::Farmer);
    let labourer = signed_up(&market, "Ravi", "ravi@example.com", UserRole::Labourer);

    let job = market
        .listings
        .post_job(farmer, harvest_job())
        .expect("job posted");
    market
        .listings
        .set_job_status(farmer, job.id, JobStatus::Closed)
        .expect("owner closes");

    let err = market
        .lifecycle
        .request_application(
            labourer,
            ApplicationRequest {
                job_id: job.id,
                message: String::new(),
            },
        )
        .expect_err("closed job not applicable");
    assert!(matches!(err, LifecycleError::ResourceNotFound));
}
