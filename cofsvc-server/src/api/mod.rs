//! Coffee catalog and order stream handlers.
//!
//! # Endpoints
//!
//! - `GET /coffees`             – list every coffee
//! - `GET /coffees/{id}`        – fetch one coffee
//! - `GET /coffees/{id}/orders` – server-sent order event stream

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use cofsvc_core::catalog::CatalogError;

use crate::state::AppState;

mod coffees;
mod orders;

/// Build the catalog API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/coffees", get(coffees::list_coffees))
        .route("/coffees/{id}", get(coffees::get_coffee))
        .route("/coffees/{id}/orders", get(orders::coffee_orders))
}

/// Errors that can occur in catalog handlers.
#[derive(Debug)]
enum ApiError {
    /// The catalog backend failed.
    Catalog(CatalogError),
    /// No coffee has the requested id.
    NotFound,
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        ApiError::Catalog(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Catalog(e) => {
                tracing::error!(error = %e, "Catalog lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, "coffee not found").into_response(),
        }
    }
}
