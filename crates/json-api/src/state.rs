//! State

use std::sync::Arc;

use crate::catalog::RestaurantCatalog;

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) catalog: Arc<dyn RestaurantCatalog>,
}

impl State {
    #[must_use]
    pub(crate) fn new(catalog: Arc<dyn RestaurantCatalog>) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub(crate) fn from_catalog(catalog: impl RestaurantCatalog + 'static) -> Arc<Self> {
        Arc::new(Self::new(Arc::new(catalog)))
    }
}
