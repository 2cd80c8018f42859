use super::domain::MarketPrice;
use crate::marketplace::store::RepositoryError;

/// Storage abstraction for the price board. Read-only from the core's
/// perspective; seeding and deletion happen through the host and the audit
/// interface.
pub trait MarketPriceRepository: Send + Sync {
    fn list(&self) -> Result<Vec<MarketPrice>, RepositoryError>;
}
