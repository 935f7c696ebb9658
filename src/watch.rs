use std::{future::Future, io, time::Duration};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::{
    clock::Clock,
    error::Result,
    format::DateFormatter,
    instant::Instant,
    keys::TimeKeys,
    tracker::{DayChange, DayTracker},
    zone::ZoneId,
};

/// Heartbeat loop: logs the current local day every `every` and a rollover
/// whenever it changes. Returns the rollovers seen once `shutdown` resolves.
pub async fn run<C, F>(
    keys: &TimeKeys<C, F>,
    zone: ZoneId,
    every: Duration,
    shutdown: impl Future<Output = ()>,
) -> Result<Vec<DayChange>>
where
    C: Clock,
    F: DateFormatter,
{
    let mut tracker = DayTracker::start(keys, zone)?;
    info!(zone = %zone, day_key = %tracker.day_key, every_secs = every.as_secs(), "watch.start");

    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut changes = Vec::new();
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!(rollovers = changes.len(), "watch.stop");
                return Ok(changes);
            }
            _ = ticker.tick() => {
                let now = Instant::new(keys.clock().now())?;
                if let Some(change) = tracker.observe(keys, now)? {
                    info!(previous = %change.previous, current = %change.current, "watch.rollover");
                    changes.push(change);
                }
                info!(day_key = %tracker.day_key, "watch.heartbeat");
            }
        }
    }
}

/// Resolves when `signal` fires. A signal that cannot be installed is logged
/// and resolves immediately.
pub async fn shutdown_on(signal: impl Future<Output = io::Result<()>>) {
    if let Err(err) = signal.await {
        warn!(%err, "watch.signal_unavailable");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Moves forward six hours on every read.
    struct SteppingClock(AtomicI64);

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let secs = self.0.fetch_add(6 * 3600, Ordering::SeqCst);
            Utc.timestamp_opt(secs, 0).single().unwrap()
        }
    }

    #[tokio::test]
    async fn reports_rollovers_in_order() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 20, 0, 0).single().unwrap();
        let keys = TimeKeys::new().with_clock(SteppingClock(AtomicI64::new(start.timestamp())));

        let changes = run(
            &keys,
            ZoneId::UTC,
            Duration::from_millis(5),
            tokio::time::sleep(Duration::from_millis(60)),
        )
        .await
        .unwrap();

        assert!(!changes.is_empty());
        assert_eq!(changes[0].previous.to_string(), "2024-01-15");
        assert_eq!(changes[0].current.to_string(), "2024-01-16");
        for pair in changes.windows(2) {
            assert_eq!(pair[0].current, pair[1].previous);
            assert!(pair[1].current > pair[1].previous);
        }
    }

    #[tokio::test]
    async fn unavailable_signal_still_stops_the_loop() {
        let failed = async { Err(io::Error::new(io::ErrorKind::Other, "no signal handler")) };
        let keys = TimeKeys::new();
        let changes = run(&keys, ZoneId::UTC, Duration::from_secs(3600), shutdown_on(failed))
            .await
            .unwrap();
        assert!(changes.is_empty());
    }
}
