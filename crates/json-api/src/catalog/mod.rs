//! Restaurant Catalog
//!
//! Read-only access to restaurants and their discount rule sets. The engine never
//! caches rules between calculations; every checkout re-fetches through this trait.

use async_trait::async_trait;
use jiff::tz::TimeZone;
use mockall::automock;
use rusty_money::iso::Currency;
use thiserror::Error;

use carte::rules::record::DiscountRecord;

mod errors;
mod file;
mod memory;

pub(crate) use errors::into_status_error;
pub(crate) use file::FileCatalog;
pub(crate) use memory::InMemoryCatalog;

#[derive(Debug, Error)]
pub(crate) enum CatalogError {
    #[error("restaurant not found")]
    NotFound,

    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// A restaurant and its persisted discount rules.
#[derive(Debug, Clone)]
pub(crate) struct Restaurant {
    pub id: String,
    pub name: String,
    pub currency: &'static Currency,
    pub time_zone: TimeZone,
    pub discounts: Vec<DiscountRecord>,
}

#[automock]
#[async_trait]
pub(crate) trait RestaurantCatalog: Send + Sync {
    async fn find_restaurant(&self, id: &str) -> Result<Restaurant, CatalogError>;
}
