use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use tokio_stream::{Stream, StreamExt};

use crate::state::AppState;

/// `GET /coffees/{id}/orders` – server-sent order events.
///
/// Opens one subscription per request. The id is deliberately not looked up
/// in the catalog. When the client disconnects axum drops the stream, which
/// closes the subscription and stops its tick task.
pub(super) async fn coffee_orders(
    State(state): State<AppState>,
    Path(coffee_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let keep_alive = state.config().await.orders.keep_alive();
    let subscription = state.orders.open(coffee_id);
    let events = subscription.map(|order| Event::default().json_data(order));
    Sse::new(events).keep_alive(KeepAlive::new().interval(keep_alive))
}
