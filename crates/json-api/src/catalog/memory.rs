//! In-memory catalog loaded from YAML

use std::{fs, io, path::Path};

use async_trait::async_trait;
use jiff::tz::TimeZone;
use rustc_hash::FxHashMap;
use rusty_money::{Findable, iso::Currency};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use carte::rules::record::DiscountRecord;

use super::{CatalogError, Restaurant, RestaurantCatalog};

#[derive(Debug, Error)]
pub(crate) enum CatalogLoadError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("restaurant {restaurant} has unknown currency {code}")]
    UnknownCurrency { restaurant: String, code: String },

    #[error("restaurant {restaurant} has unknown time zone {name}")]
    UnknownTimeZone { restaurant: String, name: String },

    #[error("restaurant {0} appears more than once")]
    DuplicateRestaurant(String),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    restaurants: Vec<RestaurantRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestaurantRecord {
    id: String,
    #[serde(default)]
    name: String,
    currency: String,
    #[serde(default)]
    time_zone: Option<String>,
    #[serde(default)]
    discounts: Vec<DiscountRecord>,
}

impl TryFrom<RestaurantRecord> for Restaurant {
    type Error = CatalogLoadError;

    fn try_from(record: RestaurantRecord) -> Result<Self, Self::Error> {
        let currency = Currency::find(record.currency.trim()).ok_or_else(|| {
            CatalogLoadError::UnknownCurrency {
                restaurant: record.id.clone(),
                code: record.currency.clone(),
            }
        })?;

        let time_zone = match record.time_zone.as_deref() {
            None => TimeZone::UTC,
            Some(name) => {
                TimeZone::get(name).map_err(|_unknown| CatalogLoadError::UnknownTimeZone {
                    restaurant: record.id.clone(),
                    name: name.to_string(),
                })?
            }
        };

        Ok(Self {
            id: record.id,
            name: record.name,
            currency,
            time_zone,
            discounts: record.discounts,
        })
    }
}

/// Catalog held entirely in memory.
#[derive(Debug, Default)]
pub(crate) struct InMemoryCatalog {
    restaurants: FxHashMap<String, Restaurant>,
}

impl InMemoryCatalog {
    pub(crate) fn from_yaml(contents: &str) -> Result<Self, CatalogLoadError> {
        let file: CatalogFile = serde_norway::from_str(contents)?;
        let mut restaurants = FxHashMap::default();

        for record in file.restaurants {
            let restaurant = Restaurant::try_from(record)?;

            if restaurants.contains_key(&restaurant.id) {
                return Err(CatalogLoadError::DuplicateRestaurant(restaurant.id));
            }

            restaurants.insert(restaurant.id.clone(), restaurant);
        }

        Ok(Self { restaurants })
    }

    pub(crate) fn from_path(path: &Path) -> Result<Self, CatalogLoadError> {
        let catalog = Self::from_yaml(&fs::read_to_string(path)?)?;

        info!(
            path = %path.display(),
            restaurants = catalog.restaurants.len(),
            "loaded restaurant catalog"
        );

        Ok(catalog)
    }
}

#[async_trait]
impl RestaurantCatalog for InMemoryCatalog {
    async fn find_restaurant(&self, id: &str) -> Result<Restaurant, CatalogError> {
        self.restaurants
            .get(id)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }
}
