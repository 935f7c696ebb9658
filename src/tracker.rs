use serde::{Deserialize, Serialize};

use crate::{
    clock::Clock,
    error::Result,
    format::DateFormatter,
    instant::Instant,
    keys::{DateKey, TimeKeys},
    zone::{AsZone, ZoneId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayChange {
    pub previous: DateKey,
    pub current: DateKey,
}

/// Tracks the current local day in one zone, e.g. to reset daily counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayTracker {
    pub zone: ZoneId,
    pub day_key: DateKey,
}

impl DayTracker {
    /// Starts on today's key according to `keys`' clock.
    pub fn start<C: Clock, F: DateFormatter>(
        keys: &TimeKeys<C, F>,
        zone: impl AsZone,
    ) -> Result<Self> {
        let zone = zone.as_zone()?;
        Ok(Self {
            zone,
            day_key: keys.today_key(zone)?,
        })
    }

    /// Reports a change when `at` falls on a later local day than the one
    /// tracked. Earlier instants (clock skew) never move the key backwards.
    pub fn observe<C: Clock, F: DateFormatter>(
        &mut self,
        keys: &TimeKeys<C, F>,
        at: Instant,
    ) -> Result<Option<DayChange>> {
        let key = keys.date_key(at, self.zone)?;
        if key <= self.day_key {
            return Ok(None);
        }
        let change = DayChange {
            previous: self.day_key,
            current: key,
        };
        self.day_key = key;
        Ok(Some(change))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn at(s: &str) -> Instant {
        s.parse().unwrap()
    }

    #[test]
    fn rollover_is_reported_once_per_local_day() {
        let keys = TimeKeys::new().with_clock(FixedClock::new(at("2024-01-15T20:00:00Z")));
        let mut t = DayTracker::start(&keys, "Europe/Paris").unwrap();
        assert_eq!(t.day_key.to_string(), "2024-01-15");

        assert_eq!(t.observe(&keys, at("2024-01-15T22:59:00Z")).unwrap(), None);

        let change = t.observe(&keys, at("2024-01-15T23:00:00Z")).unwrap().unwrap();
        assert_eq!(change.previous.to_string(), "2024-01-15");
        assert_eq!(change.current.to_string(), "2024-01-16");

        assert_eq!(t.observe(&keys, at("2024-01-16T10:00:00Z")).unwrap(), None);
    }

    #[test]
    fn earlier_instants_do_not_rewind() {
        let keys = TimeKeys::new().with_clock(FixedClock::new(at("2024-01-15T12:00:00Z")));
        let mut t = DayTracker::start(&keys, "UTC").unwrap();
        assert_eq!(t.observe(&keys, at("2024-01-14T12:00:00Z")).unwrap(), None);
        assert_eq!(t.day_key.to_string(), "2024-01-15");
    }

    #[test]
    fn bad_zone_fails_at_start() {
        assert!(DayTracker::start(&TimeKeys::new(), "Mars/Olympus").is_err());
    }
}
