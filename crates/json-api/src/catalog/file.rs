//! Catalog re-read from disk on every lookup
//!
//! Rule edits in the YAML file take effect on the next request without a restart.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::warn;

use super::{CatalogError, InMemoryCatalog, Restaurant, RestaurantCatalog};

/// Catalog backed by a YAML file that is parsed on each lookup.
#[derive(Debug, Clone)]
pub(crate) struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<InMemoryCatalog, CatalogError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|error| self.unavailable(&error))?;

        InMemoryCatalog::from_yaml(&contents).map_err(|error| self.unavailable(&error))
    }

    fn unavailable(&self, error: &dyn std::error::Error) -> CatalogError {
        warn!(path = %self.path.display(), %error, "restaurant catalog unavailable");

        CatalogError::Unavailable(error.to_string())
    }
}

#[async_trait]
impl RestaurantCatalog for FileCatalog {
    async fn find_restaurant(&self, id: &str) -> Result<Restaurant, CatalogError> {
        self.load().await?.find_restaurant(id).await
    }
}
