//! Catalog Errors

use salvo::http::StatusError;
use tracing::error;

use super::CatalogError;

pub(crate) fn into_status_error(error: CatalogError) -> StatusError {
    match error {
        CatalogError::NotFound => StatusError::not_found().brief("Restaurant not found"),
        CatalogError::Unavailable(source) => {
            error!("failed to fetch restaurant: {source}");

            StatusError::internal_server_error()
        }
    }
}
