//! Calculate Discounts Handler

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    checkout::{
        calculate_checkout,
        requests::CalculateDiscountsRequest,
        responses::DiscountResultResponse,
    },
    extensions::*,
};

/// Calculate Discounts Handler
///
/// Applies the restaurant's single best discount to the cart and explains what
/// happened to every other rule.
#[endpoint(
    tags("checkout"),
    summary = "Calculate Discounts",
    responses(
        (status_code = 200, description = "Discount result"),
        (status_code = 400, description = "Bad Request"),
        (status_code = 404, description = "Restaurant not found"),
        (status_code = 500, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CalculateDiscountsRequest>,
    depot: &mut Depot,
) -> Result<Json<DiscountResultResponse>, StatusError> {
    let request = json.into_inner();

    let checkout = calculate_checkout(
        depot.state_or_500()?,
        &request.restaurant_id,
        request.items,
        request.variable_amounts,
    )
    .await?;

    Ok(Json(DiscountResultResponse::from(&checkout)))
}
