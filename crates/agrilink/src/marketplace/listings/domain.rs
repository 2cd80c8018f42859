use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::identity::UserId;

/// Identifier wrapper for equipment listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EquipmentId(pub u64);

impl std::fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for labour jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Listings cover both machinery rentals and farm inputs (seed, fertilizer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingCategory {
    Equipment,
    Input,
}

/// Listing visibility. Only the Available/Paused toggle is an owner action;
/// "Low Stock" is reserved for stock-driven automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentStatus {
    Available,
    #[serde(rename = "Low Stock")]
    LowStock,
    Paused,
}

impl EquipmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EquipmentStatus::Available => "Available",
            EquipmentStatus::LowStock => "Low Stock",
            EquipmentStatus::Paused => "Paused",
        }
    }
}

/// A seller-owned listing.
#[derive(Debug, Clone, Serialize)]
pub struct Equipment {
    pub id: EquipmentId,
    pub name: String,
    pub category: ListingCategory,
    pub description: String,
    pub price: f64,
    pub unit: String,
    pub owner_id: UserId,
    pub image_url: String,
    pub availability: String,
    pub rating: f32,
    pub bookings: u32,
    pub status: EquipmentStatus,
    pub created_at: DateTime<Utc>,
}

/// Client payload for creating a listing. Rating, bookings, and status are
/// assigned server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEquipment {
    pub name: String,
    pub category: ListingCategory,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub unit: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub availability: String,
}

/// Fully-defaulted insert payload; the store assigns the id.
#[derive(Debug, Clone)]
pub struct EquipmentDraft {
    pub name: String,
    pub category: ListingCategory,
    pub description: String,
    pub price: f64,
    pub unit: String,
    pub owner_id: UserId,
    pub image_url: String,
    pub availability: String,
    pub rating: f32,
    pub bookings: u32,
    pub status: EquipmentStatus,
    pub created_at: DateTime<Utc>,
}

/// Job visibility. CLOSED jobs never surface in labourer discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Open,
    Closed,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Open => "OPEN",
            JobStatus::Closed => "CLOSED",
        }
    }
}

/// A farmer-posted labour job.
#[derive(Debug, Clone, Serialize)]
pub struct LabourJob {
    pub id: JobId,
    pub farmer_id: UserId,
    pub title: String,
    pub skill_required: String,
    pub description: String,
    pub wage: f64,
    pub duration: String,
    pub location: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

/// Client payload for posting a job; status is assigned server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLabourJob {
    pub title: String,
    pub skill_required: String,
    #[serde(default)]
    pub description: String,
    pub wage: f64,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub location: String,
}

/// Fully-defaulted insert payload; the store assigns the id.
#[derive(Debug, Clone)]
pub struct JobDraft {
    pub farmer_id: UserId,
    pub title: String,
    pub skill_required: String,
    pub description: String,
    pub wage: f64,
    pub duration: String,
    pub location: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}
