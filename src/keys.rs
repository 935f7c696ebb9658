//! Zone-correct day keys, clock strings and relative-day labels.
//!
//! Every value here is derived from an absolute [`Instant`] *as observed in*
//! an explicit [`ZoneId`]; neither UTC nor the process's local zone is ever
//! assumed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::{
    clock::{Clock, SystemClock},
    error::{Result, TimeKeyError},
    format::{ChronoFormatter, DateFormatter, Pattern},
    instant::{Instant, IntoInstant},
    locale::DisplayLocale,
    zone::{current_zone, AsZone, ZoneId},
};

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// A calendar day in some zone, serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The previous calendar day.
    pub fn pred(&self) -> Option<DateKey> {
        self.0.pred_opt().map(DateKey)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(d: NaiveDate) -> Self {
        Self(d)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, DATE_KEY_FORMAT).map(Self)
    }
}

impl TryFrom<String> for DateKey {
    type Error = chrono::ParseError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DateKey> for String {
    fn from(k: DateKey) -> Self {
        k.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DateLabel {
    Today,
    Yesterday,
    /// Spelled-out localized date, e.g. `lundi 15 janvier 2024`.
    Full(String),
}

impl fmt::Display for DateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateLabel::Today => f.write_str("Today"),
            DateLabel::Yesterday => f.write_str("Yesterday"),
            DateLabel::Full(s) => f.write_str(s),
        }
    }
}

/// Every derived value for one instant, as printed by `timekeys show`.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub instant: Instant,
    pub zone: ZoneId,
    pub locale: String,
    pub date_key: DateKey,
    pub clock: String,
    pub time_of_day: String,
    pub label: String,
}

/// Day keys and labels over an injectable clock and formatting backend.
#[derive(Debug, Clone, Default)]
pub struct TimeKeys<C = SystemClock, F = ChronoFormatter> {
    clock: C,
    formatter: F,
}

impl TimeKeys {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock, F: DateFormatter> TimeKeys<C, F> {
    pub fn with_parts(clock: C, formatter: F) -> Self {
        Self { clock, formatter }
    }

    pub fn with_clock<C2: Clock>(self, clock: C2) -> TimeKeys<C2, F> {
        TimeKeys {
            clock,
            formatter: self.formatter,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn date_key(&self, instant: impl IntoInstant, zone: impl AsZone) -> Result<DateKey> {
        let zone = zone.as_zone()?;
        let instant = instant.into_instant()?;
        Ok(self.key_of(instant, zone))
    }

    /// `HH:mm:ss` in `zone`.
    pub fn clock_string(&self, instant: impl IntoInstant, zone: impl AsZone) -> Result<String> {
        let zone = zone.as_zone()?;
        let instant = instant.into_instant()?;
        Ok(self
            .formatter
            .render(instant, zone, &DisplayLocale::default(), Pattern::Clock))
    }

    /// `HH:mm` in `zone`, rendered with `locale`.
    pub fn time_of_day(
        &self,
        instant: impl IntoInstant,
        zone: impl AsZone,
        locale: &DisplayLocale,
    ) -> Result<String> {
        let zone = zone.as_zone()?;
        let instant = instant.into_instant()?;
        Ok(self
            .formatter
            .render(instant, zone, locale, Pattern::ClockMinutes))
    }

    pub fn today_key(&self, zone: impl AsZone) -> Result<DateKey> {
        let zone = zone.as_zone()?;
        Ok(self.key_of(Instant::new(self.clock.now())?, zone))
    }

    /// `Today`, `Yesterday`, or the full localized date, all judged in `zone`.
    pub fn date_label(
        &self,
        instant: impl IntoInstant,
        zone: impl AsZone,
        locale: &DisplayLocale,
    ) -> Result<DateLabel> {
        let zone = zone.as_zone()?;
        let instant = instant.into_instant()?;

        let today = self.today_key(zone)?;
        let target = self.key_of(instant, zone);

        if target == today {
            return Ok(DateLabel::Today);
        }
        // Calendar arithmetic on the zone-local date, so month/year edges and
        // 23h/25h DST days resolve correctly.
        if today.pred() == Some(target) {
            return Ok(DateLabel::Yesterday);
        }
        Ok(DateLabel::Full(self.formatter.render(
            instant,
            zone,
            locale,
            Pattern::FullDate,
        )))
    }

    /// Buckets `items` by local day in `zone`, keeping input order per day.
    pub fn group_by_day<T, I, G>(
        &self,
        items: I,
        zone: impl AsZone,
        instant_of: G,
    ) -> Result<BTreeMap<DateKey, Vec<T>>>
    where
        I: IntoIterator<Item = T>,
        G: Fn(&T) -> Instant,
    {
        let zone = zone.as_zone()?;
        let mut groups: BTreeMap<DateKey, Vec<T>> = BTreeMap::new();
        for item in items {
            let key = self.key_of(instant_of(&item), zone);
            groups.entry(key).or_default().push(item);
        }
        Ok(groups)
    }

    pub fn snapshot(
        &self,
        instant: impl IntoInstant,
        zone: impl AsZone,
        locale: &DisplayLocale,
    ) -> Result<Snapshot> {
        let zone = zone.as_zone()?;
        let instant = instant.into_instant()?;
        Ok(Snapshot {
            instant,
            zone,
            locale: locale.tag().to_string(),
            date_key: self.date_key(instant, zone)?,
            clock: self.clock_string(instant, zone)?,
            time_of_day: self.time_of_day(instant, zone, locale)?,
            label: self.date_label(instant, zone, locale)?.to_string(),
        })
    }

    fn key_of(&self, instant: Instant, zone: ZoneId) -> DateKey {
        DateKey(self.formatter.local_date(instant, zone))
    }
}

fn zone_or_current(zone: Option<&str>) -> Result<ZoneId> {
    match zone {
        Some(z) => ZoneId::parse(z),
        None => Ok(current_zone()),
    }
}

fn locale_or_default(locale: Option<&str>) -> DisplayLocale {
    locale.map(DisplayLocale::parse).unwrap_or_default()
}

/// `YYYY-MM-DD` of `instant` in `zone`.
pub fn date_key(instant: impl IntoInstant, zone: &str) -> Result<DateKey> {
    TimeKeys::new().date_key(instant, zone)
}

pub fn clock_string(instant: impl IntoInstant, zone: &str) -> Result<String> {
    TimeKeys::new().clock_string(instant, zone)
}

/// `HH:mm`; `zone` defaults to [`current_zone`] and `locale` to `fr-FR`.
pub fn time_of_day(
    instant: impl IntoInstant,
    zone: Option<&str>,
    locale: Option<&str>,
) -> Result<String> {
    let zone = zone_or_current(zone)?;
    TimeKeys::new().time_of_day(instant, zone, &locale_or_default(locale))
}

/// Relative label against the system clock; defaults as for [`time_of_day`].
pub fn date_label(
    instant: impl IntoInstant,
    zone: Option<&str>,
    locale: Option<&str>,
) -> Result<DateLabel> {
    let zone = zone_or_current(zone)?;
    TimeKeys::new().date_label(instant, zone, &locale_or_default(locale))
}

pub fn today_key(zone: &str) -> Result<DateKey> {
    TimeKeys::new().today_key(zone)
}

/// Parses one instant per non-empty line, splitting out the lines that fail.
pub fn parse_lines<'a>(
    lines: impl IntoIterator<Item = &'a str>,
) -> (Vec<Instant>, Vec<TimeKeyError>) {
    let mut ok = Vec::new();
    let mut bad = Vec::new();
    for line in lines.into_iter().map(str::trim).filter(|l| !l.is_empty()) {
        match line.parse::<Instant>() {
            Ok(i) => ok.push(i),
            Err(e) => bad.push(e),
        }
    }
    (ok, bad)
}
