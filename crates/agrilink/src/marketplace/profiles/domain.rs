use serde::{Deserialize, Serialize};

use crate::marketplace::identity::UserId;

/// A labourer's public work profile. At most one per labourer, keyed by
/// user id.
#[derive(Debug, Clone, Serialize)]
pub struct LabourerProfile {
    pub user_id: UserId,
    pub skills: Vec<String>,
    pub experience_years: u32,
    pub hourly_rate: f64,
    pub location: String,
    pub phone: String,
    pub languages: Vec<String>,
    pub bio: String,
    pub rating: f32,
    pub completed_jobs: u32,
    pub availability: String,
}

/// Client payload for the upsert. Rating and completed-jobs counters are
/// not client-settable; they carry over from the existing profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileDraft {
    pub skills: Vec<String>,
    pub experience_years: u32,
    pub hourly_rate: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub availability: String,
}
