//! Discount Index Handler

use salvo::{
    oapi::extract::{PathParam, QueryParam},
    prelude::*,
};

use carte::engine::LoadedRule;

use crate::{
    catalog::into_status_error,
    discounts::responses::{DiscountListItem, DiscountsResponse},
    extensions::*,
};

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

/// Discount Index Handler
///
/// Returns a page of the restaurant's persisted rules, optionally filtered by a
/// case-insensitive substring of the rule name.
#[endpoint(
    tags("discounts"),
    summary = "List Discounts",
    responses(
        (status_code = 200, description = "A page of discounts"),
        (status_code = 400, description = "Bad Request"),
        (status_code = 404, description = "Restaurant not found"),
        (status_code = 500, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    page: QueryParam<usize, false>,
    limit: QueryParam<usize, false>,
    q: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<DiscountsResponse>, StatusError> {
    let page = page.into_inner().unwrap_or(1);

    if page == 0 {
        return Err(StatusError::bad_request().brief("page starts at 1"));
    }

    let limit = match limit.into_inner() {
        None => DEFAULT_LIMIT,
        Some(0) => return Err(StatusError::bad_request().brief("limit must be at least 1")),
        Some(limit) => limit.min(MAX_LIMIT),
    };

    let query = q
        .into_inner()
        .map(|query| query.trim().to_lowercase())
        .filter(|query| !query.is_empty());

    let restaurant = depot
        .state_or_500()?
        .catalog
        .find_restaurant(&id.into_inner())
        .await
        .map_err(into_status_error)?;

    let matching: Vec<DiscountListItem> = restaurant
        .discounts
        .iter()
        .filter(|record| {
            query
                .as_deref()
                .is_none_or(|query| record.name.to_lowercase().contains(query))
        })
        .map(|record| {
            DiscountListItem::new(record, &LoadedRule::load(record, restaurant.currency))
        })
        .collect();

    let total = matching.len();

    let discounts = matching
        .into_iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .collect();

    Ok(Json(DiscountsResponse {
        discounts,
        page,
        limit,
        total,
    }))
}
