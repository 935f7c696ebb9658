use chrono::NaiveDate;

use crate::{instant::Instant, locale::DisplayLocale, zone::ZoneId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// `HH:mm:ss`, 24-hour.
    Clock,
    /// `HH:mm`, 24-hour.
    ClockMinutes,
    /// Weekday, day, month and year spelled out for the locale.
    FullDate,
}

/// The timezone database / formatting backend.
pub trait DateFormatter: Send + Sync {
    /// Calendar date of `instant` as observed in `zone`.
    fn local_date(&self, instant: Instant, zone: ZoneId) -> NaiveDate;

    fn render(&self, instant: Instant, zone: ZoneId, locale: &DisplayLocale, pattern: Pattern)
        -> String;
}

/// chrono + chrono-tz (bundled IANA tzdata) + chrono's locale tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoFormatter;

impl DateFormatter for ChronoFormatter {
    fn local_date(&self, instant: Instant, zone: ZoneId) -> NaiveDate {
        instant.as_utc().with_timezone(&zone.tz()).date_naive()
    }

    fn render(
        &self,
        instant: Instant,
        zone: ZoneId,
        locale: &DisplayLocale,
        pattern: Pattern,
    ) -> String {
        let local = instant.as_utc().with_timezone(&zone.tz());
        let fmt = match pattern {
            Pattern::Clock => "%H:%M:%S",
            Pattern::ClockMinutes => "%H:%M",
            Pattern::FullDate => locale.full_date_pattern(),
        };
        local.format_localized(fmt, locale.locale()).to_string()
    }
}

impl<F: DateFormatter + ?Sized> DateFormatter for &F {
    fn local_date(&self, instant: Instant, zone: ZoneId) -> NaiveDate {
        (**self).local_date(instant, zone)
    }

    fn render(
        &self,
        instant: Instant,
        zone: ZoneId,
        locale: &DisplayLocale,
        pattern: Pattern,
    ) -> String {
        (**self).render(instant, zone, locale, pattern)
    }
}
