use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::SystemTime};

use crate::error::{Result, TimeKeyError};

/// PostgreSQL `timestamptz` text output, e.g. `2024-01-15 23:00:00.123+00`.
const PG_TIMESTAMPTZ: &str = "%Y-%m-%d %H:%M:%S%.f%#z";
const DATE_ONLY: &str = "%Y-%m-%d";

/// An absolute point in time. Never carries wall-clock meaning on its own.
///
/// Kept at least one day inside chrono's representable range, so viewing it
/// in any zone (offsets stay well under a day) cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "DateTime<Utc>", into = "DateTime<Utc>")]
pub struct Instant(DateTime<Utc>);

impl Instant {
    pub fn new<Tz: TimeZone>(dt: DateTime<Tz>) -> Result<Self> {
        let utc = dt.with_timezone(&Utc);
        let lo = DateTime::<Utc>::MIN_UTC.checked_add_signed(Duration::days(1));
        let hi = DateTime::<Utc>::MAX_UTC.checked_sub_signed(Duration::days(1));
        match (lo, hi) {
            (Some(lo), Some(hi)) if lo <= utc && utc <= hi => Ok(Self(utc)),
            _ => Err(TimeKeyError::invalid_instant(format!("{utc:?}"))),
        }
    }

    pub fn from_epoch_millis(ms: i64) -> Result<Self> {
        let dt = Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| TimeKeyError::invalid_instant(ms.to_string()))?;
        Self::new(dt).map_err(|_| TimeKeyError::invalid_instant(ms.to_string()))
    }

    pub fn from_system_time(t: SystemTime) -> Result<Self> {
        let epoch = Utc.timestamp_opt(0, 0).single();
        let dt = match t.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(after) => Duration::from_std(after)
                .ok()
                .and_then(|d| epoch?.checked_add_signed(d)),
            Err(before) => Duration::from_std(before.duration())
                .ok()
                .and_then(|d| epoch?.checked_sub_signed(d)),
        };
        match dt {
            Some(dt) => Self::new(dt),
            None => Err(TimeKeyError::invalid_instant(format!("{t:?}"))),
        }
    }

    pub fn as_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl TryFrom<DateTime<Utc>> for Instant {
    type Error = TimeKeyError;

    fn try_from(dt: DateTime<Utc>) -> Result<Self> {
        Self::new(dt)
    }
}

impl From<Instant> for DateTime<Utc> {
    fn from(i: Instant) -> Self {
        i.0
    }
}

impl FromStr for Instant {
    type Err = TimeKeyError;

    /// Accepts RFC 3339, PostgreSQL `timestamptz` text, or a bare date (UTC
    /// midnight). Date-times without an offset are rejected.
    fn from_str(s: &str) -> Result<Self> {
        let raw = s.trim();

        let parsed = DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_str(raw, PG_TIMESTAMPTZ))
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                let midnight = NaiveDate::parse_from_str(raw, DATE_ONLY)
                    .ok()?
                    .and_hms_opt(0, 0, 0)?;
                Some(Utc.from_utc_datetime(&midnight))
            });

        if let Some(dt) = parsed {
            return Self::new(dt).map_err(|_| TimeKeyError::invalid_instant(s));
        }

        Err(TimeKeyError::invalid_instant(s))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

/// Anything a caller may hand in as "the instant": parsed values or text.
pub trait IntoInstant {
    fn into_instant(self) -> Result<Instant>;
}

impl IntoInstant for Instant {
    fn into_instant(self) -> Result<Instant> {
        Ok(self)
    }
}

impl<Tz: TimeZone> IntoInstant for DateTime<Tz> {
    fn into_instant(self) -> Result<Instant> {
        Instant::new(self)
    }
}

impl IntoInstant for SystemTime {
    fn into_instant(self) -> Result<Instant> {
        Instant::from_system_time(self)
    }
}

impl IntoInstant for &str {
    fn into_instant(self) -> Result<Instant> {
        self.parse()
    }
}

impl IntoInstant for &String {
    fn into_instant(self) -> Result<Instant> {
        self.parse()
    }
}

impl IntoInstant for String {
    fn into_instant(self) -> Result<Instant> {
        self.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).single().unwrap()
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let i: Instant = "2024-01-16T00:00:00+01:00".parse().unwrap();
        assert_eq!(i.as_utc(), utc(2024, 1, 15, 23, 0, 0));
    }

    #[test]
    fn parses_postgres_timestamptz() {
        let i: Instant = "2024-01-15 23:00:00+00".parse().unwrap();
        assert_eq!(i.as_utc(), utc(2024, 1, 15, 23, 0, 0));

        let i: Instant = "2024-01-16 04:30:00.250+05:30".parse().unwrap();
        assert_eq!(i.as_utc().timestamp(), utc(2024, 1, 15, 23, 0, 0).timestamp());
    }

    #[test]
    fn bare_date_is_utc_midnight() {
        let i: Instant = "2024-01-15".parse().unwrap();
        assert_eq!(i.as_utc(), utc(2024, 1, 15, 0, 0, 0));
    }

    #[test]
    fn rejects_garbage_and_offsetless_datetimes() {
        for bad in ["", "yesterday", "2024-13-40", "2024-01-15T23:00:00"] {
            let err = bad.parse::<Instant>().unwrap_err();
            assert_eq!(err, TimeKeyError::invalid_instant(bad));
        }
    }

    #[test]
    fn epoch_millis() {
        let i = Instant::from_epoch_millis(1_705_359_600_000).unwrap();
        assert_eq!(i.as_utc(), utc(2024, 1, 15, 23, 0, 0));
    }

    #[test]
    fn range_edges_are_rejected() {
        // Representable by chrono, but Asia/Tokyo local time would overflow.
        assert_eq!(
            Instant::from_epoch_millis(8_210_266_876_799_000),
            Err(TimeKeyError::invalid_instant("8210266876799000"))
        );
        assert!(Instant::new(DateTime::<Utc>::MIN_UTC).is_err());
        assert!(Instant::new(DateTime::<Utc>::MAX_UTC).is_err());
        assert!("+262142-12-31T23:59:59Z".parse::<Instant>().is_err());

        let near_max = DateTime::<Utc>::MAX_UTC - Duration::days(2);
        assert!(Instant::new(near_max).is_ok());
    }

    #[test]
    fn system_time_round_trip() {
        let t = SystemTime::UNIX_EPOCH + std::time::Duration::from_millis(1_705_359_600_000);
        assert_eq!(Instant::from_system_time(t).unwrap().as_utc(), utc(2024, 1, 15, 23, 0, 0));
    }

    #[test]
    fn serde_rejects_out_of_range() {
        let i: Instant = serde_json::from_str("\"2024-01-15T23:00:00Z\"").unwrap();
        assert_eq!(i.as_utc(), utc(2024, 1, 15, 23, 0, 0));
        let max = serde_json::to_string(&DateTime::<Utc>::MAX_UTC).unwrap();
        assert!(serde_json::from_str::<Instant>(&max).is_err());
    }
}
