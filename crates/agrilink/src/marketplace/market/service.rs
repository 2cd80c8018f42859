use std::sync::Arc;

use super::domain::MarketPrice;
use super::repository::MarketPriceRepository;
use crate::marketplace::store::RepositoryError;

/// Serves the seeded price rows to the display layer.
pub struct MarketBoard<M> {
    prices: Arc<M>,
}

impl<M> MarketBoard<M>
where
    M: MarketPriceRepository + 'static,
{
    pub fn new(prices: Arc<M>) -> Self {
        Self { prices }
    }

    pub fn quotes(&self) -> Result<Vec<MarketPrice>, MarketError> {
        Ok(self.prices.list()?)
    }
}

/// Error raised by the market board.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
