//! Create Checkout Session Handler

use rusty_money::Money;
use salvo::{oapi::extract::JsonBody, prelude::*};
use tracing::info;

use crate::{
    checkout::{
        calculate_checkout,
        requests::CreateSessionRequest,
        responses::CheckoutSessionResponse,
    },
    extensions::*,
};

/// Create Checkout Session Handler
///
/// Recalculates the cart server-side and returns the amount to charge along with the
/// discount record stored on the order. A client discount that disagrees with the
/// server is reported in `notice`; the server figure is always the one charged.
#[endpoint(
    tags("checkout"),
    summary = "Create Checkout Session",
    responses(
        (status_code = 201, description = "Checkout session created"),
        (status_code = 400, description = "Bad Request"),
        (status_code = 404, description = "Restaurant not found"),
        (status_code = 500, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateSessionRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CheckoutSessionResponse>, StatusError> {
    let request = json.into_inner();

    let checkout = calculate_checkout(
        depot.state_or_500()?,
        &request.restaurant_id,
        request.items,
        request.variable_amounts,
    )
    .await?;

    let result = &checkout.result;
    let total_discount = result.total_discount().to_minor_units();

    let notice = request
        .client_total_discount
        .filter(|client| *client != total_discount)
        .map(|client| {
            info!(
                restaurant_id = %checkout.restaurant.id,
                client_total_discount = client,
                total_discount,
                "client discount differs from server calculation"
            );

            format!(
                "Your discount was updated to {} (was {}).",
                result.total_discount(),
                Money::from_minor(client, checkout.restaurant.currency)
            )
        });

    res.status_code(StatusCode::CREATED);

    Ok(Json(CheckoutSessionResponse {
        restaurant_id: checkout.restaurant.id.clone(),
        currency: checkout.restaurant.currency.iso_alpha_code.to_string(),
        subtotal: result.subtotal().to_minor_units(),
        total_discount,
        amount_due: result.total().to_minor_units(),
        applied_discount_ids: result
            .applied_discounts()
            .iter()
            .map(|rule| rule.id().to_string())
            .collect(),
        notice,
    }))
}
