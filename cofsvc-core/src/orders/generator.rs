use super::clock::AnchoredClock;
use super::subscription::{OrderSubscription, StatsCounters};
use cofsvc_sdk::objects::CoffeeOrder;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Tick interval used when none is configured.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Opens independent, timer-paced order streams.
///
/// Every subscription gets its own tick task whose cancellation token is a
/// child of the generator's shutdown token, so [`shutdown`](Self::shutdown)
/// ends every open stream at once.
#[derive(Debug)]
pub struct OrderStreamGenerator {
    interval_ms: AtomicU64,
    shutdown: CancellationToken,
    active: Arc<AtomicUsize>,
}

impl OrderStreamGenerator {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval_ms: AtomicU64::new(clamp_interval(interval).as_millis() as u64),
            shutdown: CancellationToken::new(),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Interval given to subscriptions opened from now on.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.load(Ordering::Relaxed))
    }

    /// Change the interval for future subscriptions. Open ones keep theirs.
    pub fn set_interval(&self, interval: Duration) {
        self.interval_ms
            .store(clamp_interval(interval).as_millis() as u64, Ordering::Relaxed);
    }

    /// Number of tick tasks still running.
    pub fn active_subscriptions(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    /// Cancel every subscription, including ones opened after this call.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Open an order stream for `target_id`.
    ///
    /// The id is not checked against the catalog; any string is accepted
    /// and copied into every order. The first order is produced one interval
    /// after this call.
    pub fn open(&self, target_id: impl Into<String>) -> OrderSubscription {
        let target_id = target_id.into();
        let interval = self.interval();
        let cancel = self.shutdown.child_token();
        let stats = Arc::new(StatsCounters::default());
        let (tx, rx) = mpsc::channel(1);

        let ticker = Ticker {
            target_id: target_id.clone(),
            interval,
            tx,
            cancel: cancel.clone(),
            stats: stats.clone(),
            _active: ActiveGuard::acquire(&self.active),
        };
        tokio::spawn(ticker.run());

        debug!(%target_id, ?interval, "Order subscription opened");
        OrderSubscription::new(target_id, interval, rx, cancel, stats)
    }
}

impl Default for OrderStreamGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

fn clamp_interval(interval: Duration) -> Duration {
    interval.max(MIN_TICK_INTERVAL)
}

/// Keeps the generator's live-subscription gauge accurate for as long as a
/// tick task exists, however it ends.
struct ActiveGuard(Arc<AtomicUsize>);

impl ActiveGuard {
    fn acquire(active: &Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::Relaxed);
        Self(active.clone())
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Producer half of a subscription.
struct Ticker {
    target_id: String,
    interval: Duration,
    tx: mpsc::Sender<CoffeeOrder>,
    cancel: CancellationToken,
    stats: Arc<StatsCounters>,
    _active: ActiveGuard,
}

impl Ticker {
    async fn run(self) {
        let clock = AnchoredClock::start();
        let mut timer = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                // Cancellation wins over a tick that is due at the same time.
                _ = self.cancel.cancelled() => break,

                _ = timer.tick() => {
                    let order = CoffeeOrder::new(self.target_id.clone(), clock.now());
                    match self.tx.try_send(order) {
                        Ok(()) => self.stats.record_emitted(),
                        Err(TrySendError::Full(_)) => self.stats.record_dropped(),
                        Err(TrySendError::Closed(_)) => break,
                    }
                }
            }
        }
    }
}
