use cofsvc_sdk::objects::CoffeeOrder;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Why [`OrderSubscription::try_next`] returned nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TryNextError {
    /// No order is pending; the next tick has not fired yet.
    #[error("no order pending")]
    WouldBlock,
    /// The subscription was closed or its generator shut down.
    #[error("subscription closed")]
    Closed,
}

/// Point-in-time delivery counters of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubscriptionStats {
    /// Orders handed to the consumer's slot.
    pub emitted: u64,
    /// Ticks whose order was discarded because the slot was still full.
    pub dropped: u64,
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    emitted: AtomicU64,
    dropped: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn record_emitted(&self) {
        self.emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> SubscriptionStats {
        SubscriptionStats {
            emitted: self.emitted.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// The consumer side of one order stream.
///
/// Created by [`OrderStreamGenerator::open`](super::OrderStreamGenerator::open).
/// Dropping the subscription closes it, so a handler that owns it releases
/// the tick task as soon as the connection goes away.
#[derive(Debug)]
pub struct OrderSubscription {
    target_id: String,
    interval: Duration,
    rx: mpsc::Receiver<CoffeeOrder>,
    cancel: CancellationToken,
    stats: Arc<StatsCounters>,
    closed: bool,
}

impl OrderSubscription {
    pub(crate) fn new(
        target_id: String,
        interval: Duration,
        rx: mpsc::Receiver<CoffeeOrder>,
        cancel: CancellationToken,
        stats: Arc<StatsCounters>,
    ) -> Self {
        Self {
            target_id,
            interval,
            rx,
            cancel,
            stats,
            closed: false,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn stats(&self) -> SubscriptionStats {
        self.stats.snapshot()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Wait for the next delivered order.
    ///
    /// Returns `None` once the subscription is closed or the generator has
    /// shut down.
    pub async fn next(&mut self) -> Option<CoffeeOrder> {
        if self.closed {
            return None;
        }
        self.rx.recv().await
    }

    /// Take the pending order without waiting.
    pub fn try_next(&mut self) -> Result<CoffeeOrder, TryNextError> {
        if self.closed {
            return Err(TryNextError::Closed);
        }
        match self.rx.try_recv() {
            Ok(order) => Ok(order),
            Err(TryRecvError::Empty) => Err(TryNextError::WouldBlock),
            Err(TryRecvError::Disconnected) => Err(TryNextError::Closed),
        }
    }

    /// Stop the tick task and discard any pending order.
    ///
    /// Safe to call any number of times.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.cancel.cancel();
        self.rx.close();
        while self.rx.try_recv().is_ok() {}

        let stats = self.stats.snapshot();
        debug!(
            target_id = %self.target_id,
            emitted = stats.emitted,
            dropped = stats.dropped,
            "Order subscription closed"
        );
    }
}

impl Drop for OrderSubscription {
    fn drop(&mut self) {
        self.close();
    }
}

impl Stream for OrderSubscription {
    type Item = CoffeeOrder;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<CoffeeOrder>> {
        if self.closed {
            return Poll::Ready(None);
        }
        self.rx.poll_recv(cx)
    }
}
