use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for market price rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarketPriceId(pub u64);

impl std::fmt::Display for MarketPriceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A crop price quote at a mandi.
#[derive(Debug, Clone, Serialize)]
pub struct MarketPrice {
    pub id: MarketPriceId,
    pub crop_name: String,
    pub price: f64,
    pub unit: String,
    pub market_location: String,
    pub updated_at: DateTime<Utc>,
}
