use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::identity::UserId;
use crate::marketplace::listings::{EquipmentId, JobId};

/// Identifier wrapper for equipment bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookingId(pub u64);

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for job applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub u64);

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request state. PENDING is the only state a decision can leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Accepted => "ACCEPTED",
            RequestStatus::Rejected => "REJECTED",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Accepted | RequestStatus::Rejected)
    }
}

/// The owner's verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionOutcome {
    Accepted,
    Rejected,
}

impl DecisionOutcome {
    pub const fn as_status(self) -> RequestStatus {
        match self {
            DecisionOutcome::Accepted => RequestStatus::Accepted,
            DecisionOutcome::Rejected => RequestStatus::Rejected,
        }
    }
}

/// A farmer's request for an equipment slot. The seller id is resolved from
/// the listing's owner at creation time.
#[derive(Debug, Clone, Serialize)]
pub struct EquipmentBooking {
    pub id: BookingId,
    pub equipment_id: EquipmentId,
    pub farmer_id: UserId,
    pub seller_id: UserId,
    pub slot: String,
    pub price: f64,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub equipment_id: EquipmentId,
    pub farmer_id: UserId,
    pub seller_id: UserId,
    pub slot: String,
    pub price: f64,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Client payload for requesting a booking.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub equipment_id: EquipmentId,
    pub slot: String,
    pub price: f64,
}

/// A labourer's application to an open job. The job's farmer is not
/// denormalized here; authorization resolves it through the job record.
#[derive(Debug, Clone, Serialize)]
pub struct JobApplication {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub labourer_id: UserId,
    pub status: RequestStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone)]
pub struct ApplicationDraft {
    pub job_id: JobId,
    pub labourer_id: UserId,
    pub status: RequestStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Client payload for applying to a job.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationRequest {
    pub job_id: JobId,
    #[serde(default)]
    pub message: String,
}

/// Seller-facing booking queue entry, joined with the listing and the
/// requesting farmer. Join fields fall back to empty strings when the
/// counterpart record has been deleted.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerBookingView {
    pub id: BookingId,
    pub equipment_id: EquipmentId,
    pub equipment_name: String,
    pub farmer_id: UserId,
    pub farmer_name: String,
    pub farmer_email: String,
    pub slot: String,
    pub price: f64,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Farmer-facing view of their own booking requests.
#[derive(Debug, Clone, Serialize)]
pub struct RequesterBookingView {
    pub id: BookingId,
    pub equipment_id: EquipmentId,
    pub equipment_name: String,
    pub seller_id: UserId,
    pub slot: String,
    pub price: f64,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Farmer-facing application queue entry, joined with the job and the
/// applying labourer.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerApplicationView {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub job_title: String,
    pub labourer_id: UserId,
    pub labourer_name: String,
    pub labourer_email: String,
    pub message: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Labourer-facing view of their own applications, joined with job terms.
#[derive(Debug, Clone, Serialize)]
pub struct RequesterApplicationView {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub job_title: String,
    pub wage: f64,
    pub skill_required: String,
    pub location: String,
    pub message: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}
