//! Read-only mandi price board.
//!
//! There is no live feed behind this; the host seeds the repository and the
//! board serves it verbatim. The rows are still first-class store records so
//! the audit interface can list and delete them.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{MarketPrice, MarketPriceId};
pub use repository::MarketPriceRepository;
pub use router::market_router;
pub use service::{MarketBoard, MarketError};
