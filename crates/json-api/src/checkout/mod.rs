//! Checkout
//!
//! Authoritative discount calculation. Rules are always re-fetched from the catalog
//! and evaluated against the server clock in the restaurant's time zone; nothing the
//! client calculated is trusted.

use jiff::Timestamp;
use salvo::prelude::StatusError;
use tracing::debug;

use carte::{
    cart::CartSnapshot, context::EvaluationContext, engine::DiscountEngine,
    result::DiscountResult,
};

use crate::{
    catalog::{Restaurant, into_status_error},
    checkout::requests::{CartItemRequest, VariableAmountRequest, variable_amounts},
    extensions::*,
    state::State,
};

mod handlers;
mod requests;
mod responses;

pub(crate) use handlers::*;

/// A calculated cart.
#[derive(Debug)]
pub(crate) struct Checkout {
    pub restaurant: Restaurant,
    pub cart: CartSnapshot<'static>,
    pub result: DiscountResult<'static>,
}

pub(crate) async fn calculate_checkout(
    state: &State,
    restaurant_id: &str,
    items: Vec<CartItemRequest>,
    variables: Vec<VariableAmountRequest>,
) -> Result<Checkout, StatusError> {
    let restaurant = state
        .catalog
        .find_restaurant(restaurant_id)
        .await
        .map_err(into_status_error)?;

    let cart = CartSnapshot::from_records(items.into_iter().map(Into::into), restaurant.currency)
        .or_400("invalid cart")?;

    debug!(
        restaurant = %restaurant.name,
        lines = cart.len(),
        "calculating checkout discounts"
    );

    let context = EvaluationContext::new(Timestamp::now(), &restaurant.time_zone)
        .with_variable_amounts(variable_amounts(variables));

    let result = DiscountEngine::from_records(&restaurant.discounts, restaurant.currency)
        .calculate(&cart, &context)
        .or_500("discount calculation failed")?;

    Ok(Checkout {
        restaurant,
        cart,
        result,
    })
}
