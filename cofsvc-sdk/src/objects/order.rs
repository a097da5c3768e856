use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A synthetic order event emitted on every tick of an order stream.
///
/// `coffee_id` is passed through from the stream request and is never
/// checked against the catalog.
///
/// ```json
/// {"coffeeId":"5f0c...","now":"2024-05-01T12:00:00.123456789Z"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoffeeOrder {
    pub coffee_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub now: OffsetDateTime,
}

impl CoffeeOrder {
    pub fn new(coffee_id: impl Into<String>, now: OffsetDateTime) -> Self {
        Self {
            coffee_id: coffee_id.into(),
            now,
        }
    }
}
