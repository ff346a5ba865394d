//! App Router

use salvo::Router;

use crate::{checkout, discounts, healthcheck};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::with_path("restaurants/{id}/discounts")
                .get(discounts::index::handler)
                .push(Router::with_path("active").get(discounts::active::handler)),
        )
        .push(
            Router::with_path("checkout")
                .push(Router::with_path("calculate-discounts").post(checkout::calculate::handler))
                .push(Router::with_path("create-session").post(checkout::session::handler)),
        )
}
