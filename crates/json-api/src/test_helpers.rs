//! Test helpers.

use jiff::tz::TimeZone;
use rust_decimal::Decimal;
use rusty_money::iso::USD;
use salvo::{affix_state::inject, prelude::*};

use carte::rules::record::DiscountRecord;

use crate::{
    catalog::{CatalogError, MockRestaurantCatalog, Restaurant},
    state::State,
};

pub(crate) const TEST_RESTAURANT_ID: &str = "bistro";

pub(crate) fn make_restaurant(discounts: Vec<DiscountRecord>) -> Restaurant {
    Restaurant {
        id: TEST_RESTAURANT_ID.to_string(),
        name: "Bistro".to_string(),
        currency: USD,
        time_zone: TimeZone::UTC,
        discounts,
    }
}

pub(crate) fn make_record(id: &str, amount_type: &str, amount: i64) -> DiscountRecord {
    DiscountRecord {
        id: id.to_string(),
        name: id.to_string(),
        amount_type: Some(amount_type.to_string()),
        amount: Some(Decimal::from(amount)),
        automatic_discount: true,
        discount_apply_to: Some("item_category".to_string()),
        add_all_items_to_purchase: true,
        ..DiscountRecord::default()
    }
}

/// A catalog that serves `restaurant` exactly once.
pub(crate) fn catalog_with(restaurant: Restaurant) -> MockRestaurantCatalog {
    let mut catalog = MockRestaurantCatalog::new();

    catalog
        .expect_find_restaurant()
        .once()
        .withf(|id: &str| id == TEST_RESTAURANT_ID)
        .return_once(move |_| Ok(restaurant));

    catalog
}

/// A catalog whose single lookup fails with `error`.
pub(crate) fn catalog_failing(error: CatalogError) -> MockRestaurantCatalog {
    let mut catalog = MockRestaurantCatalog::new();

    catalog
        .expect_find_restaurant()
        .once()
        .return_once(move |_| Err(error));

    catalog
}

pub(crate) fn catalog_service(catalog: MockRestaurantCatalog, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::from_catalog(catalog)))
            .push(route),
    )
}
