//! Active Discounts Handler

use salvo::{
    oapi::extract::{PathParam, QueryParam},
    prelude::*,
};

use carte::engine::{DiscountEngine, LoadedRule};

use crate::{
    catalog::into_status_error, discounts::responses::ActiveDiscountResponse, extensions::*,
};

/// Active Discounts Handler
///
/// Returns the restaurant's automatic rules that are live at `at` (default now). This
/// is a display list only; checkout re-checks every rule against the cart.
#[endpoint(
    tags("discounts"),
    summary = "List Active Discounts",
    responses(
        (status_code = 200, description = "Active discounts"),
        (status_code = 400, description = "Bad Request"),
        (status_code = 404, description = "Restaurant not found"),
        (status_code = 500, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<ActiveDiscountResponse>>, StatusError> {
    let restaurant = depot
        .state_or_500()?
        .catalog
        .find_restaurant(&id.into_inner())
        .await
        .map_err(into_status_error)?;

    let context = at.into_context(&restaurant.time_zone)?;
    let rules = restaurant
        .discounts
        .iter()
        .filter_map(|record| LoadedRule::load(record, restaurant.currency).into_rule());
    let engine = DiscountEngine::from_rules(rules, restaurant.currency);

    Ok(Json(engine.active_rules(&context).map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::{
        catalog::CatalogError,
        test_helpers::{
            catalog_failing, catalog_service, catalog_with, make_record, make_restaurant,
        },
    };

    use super::*;

    fn make_service(catalog: crate::catalog::MockRestaurantCatalog) -> Service {
        catalog_service(
            catalog,
            Router::with_path("restaurants/{id}/discounts/active").get(handler),
        )
    }

    fn lunch_only() -> carte::rules::record::DiscountRecord {
        let mut record = make_record("lunch", "fixed", 500);

        record.set_schedule = true;
        record.schedule_days.monday = true;
        record.schedule_time_start = Some("11:30".to_string());
        record.schedule_time_end = Some("14:30".to_string());

        record
    }

    #[tokio::test]
    async fn test_active_lists_live_automatic_rules() -> TestResult {
        let mut manual = make_record("manual", "fixed", 100);
        manual.automatic_discount = false;

        let mut broken = make_record("broken", "fixed", 100);
        broken.discount_apply_to = None;

        let restaurant = make_restaurant(vec![
            make_record("ten-percent", "percentage", 10),
            manual,
            broken,
            lunch_only(),
        ]);

        // 2024-01-01 is a Monday.
        let response: Vec<ActiveDiscountResponse> = TestClient::get(
            "http://example.com/restaurants/bistro/discounts/active?at=2024-01-01T12:00:00Z",
        )
        .send(&make_service(catalog_with(restaurant)))
        .await
        .take_json()
        .await?;

        let ids: Vec<&str> = response.iter().map(|rule| rule.id.as_str()).collect();

        assert_eq!(ids, vec!["ten-percent", "lunch"]);

        let lunch = response.get(1).ok_or("missing lunch rule")?;

        assert_eq!(lunch.amount, Some(500));
        assert_eq!(lunch.amount_type, "fixed");

        let schedule = lunch.schedule.as_ref().ok_or("missing schedule")?;

        assert_eq!(schedule.days, vec!["monday"]);
        assert_eq!(schedule.start, "11:30");
        assert_eq!(schedule.end, "14:30");

        Ok(())
    }

    #[tokio::test]
    async fn test_active_accepts_restaurant_local_times() -> TestResult {
        let restaurant = make_restaurant(vec![lunch_only()]);

        let response: Vec<ActiveDiscountResponse> = TestClient::get(
            "http://example.com/restaurants/bistro/discounts/active?at=2024-01-01T18:00",
        )
        .send(&make_service(catalog_with(restaurant)))
        .await
        .take_json()
        .await?;

        assert!(response.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_active_rejects_unparseable_times() -> TestResult {
        let res = TestClient::get(
            "http://example.com/restaurants/bistro/discounts/active?at=lunchtime",
        )
        .send(&make_service(catalog_with(make_restaurant(vec![]))))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_active_unknown_restaurant_returns_404() -> TestResult {
        let res = TestClient::get("http://example.com/restaurants/nowhere/discounts/active")
            .send(&make_service(catalog_failing(CatalogError::NotFound)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_active_catalog_failure_returns_500() -> TestResult {
        let res = TestClient::get("http://example.com/restaurants/bistro/discounts/active")
            .send(&make_service(catalog_failing(CatalogError::Unavailable(
                "connection reset".to_string(),
            ))))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
