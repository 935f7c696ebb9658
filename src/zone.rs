use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::debug;

use crate::error::{Result, TimeKeyError};

/// An IANA timezone known to the bundled tz database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ZoneId(Tz);

impl ZoneId {
    pub const UTC: ZoneId = ZoneId(Tz::UTC);

    /// Unknown or empty names are an error; nothing is defaulted.
    pub fn parse(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(TimeKeyError::invalid_timezone(name));
        }
        name.parse::<Tz>()
            .map(Self)
            .map_err(|_| TimeKeyError::invalid_timezone(name))
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn tz(&self) -> Tz {
        self.0
    }
}

impl From<Tz> for ZoneId {
    fn from(tz: Tz) -> Self {
        Self(tz)
    }
}

impl FromStr for ZoneId {
    type Err = TimeKeyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ZoneId {
    type Error = TimeKeyError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<ZoneId> for String {
    fn from(z: ZoneId) -> Self {
        z.name().to_string()
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Callers hand zones in as names or as already-resolved values.
pub trait AsZone {
    fn as_zone(&self) -> Result<ZoneId>;
}

impl AsZone for ZoneId {
    fn as_zone(&self) -> Result<ZoneId> {
        Ok(*self)
    }
}

impl AsZone for Tz {
    fn as_zone(&self) -> Result<ZoneId> {
        Ok(ZoneId(*self))
    }
}

impl AsZone for str {
    fn as_zone(&self) -> Result<ZoneId> {
        ZoneId::parse(self)
    }
}

impl AsZone for String {
    fn as_zone(&self) -> Result<ZoneId> {
        ZoneId::parse(self)
    }
}

impl<T: AsZone + ?Sized> AsZone for &T {
    fn as_zone(&self) -> Result<ZoneId> {
        (**self).as_zone()
    }
}

/// The host's timezone. Never fails: `TZ`, then the OS setting, then UTC.
pub fn current_zone() -> ZoneId {
    resolve_zone(
        std::env::var("TZ").ok(),
        iana_time_zone::get_timezone().ok(),
    )
}

fn resolve_zone(env_tz: Option<String>, host_tz: Option<String>) -> ZoneId {
    let candidates = [("TZ", env_tz), ("host", host_tz)];
    for (source, name) in candidates {
        let Some(name) = name else { continue };
        // POSIX allows a leading ':' on TZ values.
        let name = name.trim().trim_start_matches(':');
        match ZoneId::parse(name) {
            Ok(zone) => return zone,
            Err(_) => debug!(source, zone = name, "current_zone.unrecognized"),
        }
    }
    debug!("current_zone.fallback_utc");
    ZoneId::UTC
}
