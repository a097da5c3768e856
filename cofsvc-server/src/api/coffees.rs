use axum::{
    Json,
    extract::{Path, State},
};
use cofsvc_core::entities::coffee::{GetCoffeeById, ListCoffees};
use cofsvc_sdk::objects::Coffee;
use kanau::processor::Processor;

use super::ApiError;
use crate::state::AppState;

/// `GET /coffees` – every coffee as one JSON array.
pub(super) async fn list_coffees(
    State(state): State<AppState>,
) -> Result<Json<Vec<Coffee>>, ApiError> {
    let records = state.catalog.process(ListCoffees).await?;
    Ok(Json(records.into_iter().map(Coffee::from).collect()))
}

/// `GET /coffees/{id}` – a single coffee, or 404.
pub(super) async fn get_coffee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Coffee>, ApiError> {
    let record = state
        .catalog
        .process(GetCoffeeById { id })
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(record.into()))
}
