//! Order stream generation.
//!
//! Each stream request opens one [`OrderSubscription`] through the
//! [`OrderStreamGenerator`]. A subscription owns a dedicated tick task that
//! produces a [`CoffeeOrder`](cofsvc_sdk::objects::CoffeeOrder) every
//! interval and hands it to the consumer through a single-slot buffer.
//!
//! # Backpressure
//!
//! The tick task never waits for the consumer. If the previous order is
//! still unconsumed when a tick fires, the new order is dropped. A slow
//! consumer therefore sees a lower effective rate, never a burst of
//! catch-up orders, and memory per subscription stays bounded.
//!
//! # Lifecycle
//!
//! ```text
//! open() ──► tick task ──try_send──► [slot: 1] ──► next() / Stream
//!               ▲                                    │
//!               └──── CancellationToken ◄── close() / Drop / shutdown()
//! ```

mod clock;
mod generator;
mod subscription;

pub use generator::{DEFAULT_TICK_INTERVAL, OrderStreamGenerator};
pub use subscription::{OrderSubscription, SubscriptionStats, TryNextError};
