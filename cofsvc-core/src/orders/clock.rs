use time::OffsetDateTime;
use tokio::time::Instant;

/// Wall-clock timestamps derived from the runtime's monotonic clock.
///
/// The wall time is sampled once; later readings add the monotonic time
/// elapsed since then, so consecutive readings never go backwards even if
/// the system clock is adjusted.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AnchoredClock {
    wall: OffsetDateTime,
    mono: Instant,
}

impl AnchoredClock {
    pub(crate) fn start() -> Self {
        Self {
            wall: OffsetDateTime::now_utc(),
            mono: Instant::now(),
        }
    }

    pub(crate) fn now(&self) -> OffsetDateTime {
        self.wall + self.mono.elapsed()
    }
}
