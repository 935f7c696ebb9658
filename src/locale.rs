use chrono::Locale;
use std::fmt;
use tracing::debug;

pub const DEFAULT_LOCALE: &str = "fr-FR";

/// A display locale: the chrono locale used for month and weekday names,
/// plus the shape of the spelled-out date for that language.
#[derive(Clone)]
pub struct DisplayLocale {
    locale: Locale,
    tag: String,
    full_date: &'static str,
}

impl DisplayLocale {
    /// Accepts `fr-FR`, `fr_FR` or a bare language such as `de`. Unknown tags
    /// fall back to the default locale.
    pub fn parse(tag: &str) -> Self {
        match resolve(tag) {
            Some(locale) => locale,
            None => {
                debug!(tag, fallback = DEFAULT_LOCALE, "locale.unknown");
                Self::default()
            }
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Canonical `ll_RR` name of the resolved locale.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// strftime pattern for `weekday day month year`.
    pub fn full_date_pattern(&self) -> &'static str {
        self.full_date
    }
}

impl Default for DisplayLocale {
    fn default() -> Self {
        Self {
            locale: Locale::fr_FR,
            tag: "fr_FR".to_string(),
            full_date: "%A %-d %B %Y",
        }
    }
}

impl fmt::Debug for DisplayLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DisplayLocale").field(&self.tag).finish()
    }
}

impl From<&str> for DisplayLocale {
    fn from(tag: &str) -> Self {
        Self::parse(tag)
    }
}

fn resolve(tag: &str) -> Option<DisplayLocale> {
    let mut parts = tag.trim().split(['-', '_']);
    let lang = parts.next().filter(|l| !l.is_empty())?.to_ascii_lowercase();
    let region = parts.next().map(|r| r.to_ascii_uppercase());

    let region = match (lang.as_str(), region) {
        (_, Some(r)) => r,
        ("en", None) => "US".to_string(),
        (l, None) => l.to_ascii_uppercase(),
    };

    let tag = format!("{lang}_{region}");
    let locale = Locale::try_from(tag.as_str()).ok()?;

    Some(DisplayLocale {
        locale,
        full_date: full_date_pattern(&lang, &region),
        tag,
    })
}

fn full_date_pattern(lang: &str, region: &str) -> &'static str {
    match (lang, region) {
        ("en", "US") | ("en", "PH") => "%A, %B %-d, %Y",
        ("de", _) => "%A, %-d. %B %Y",
        ("es", _) | ("pt", _) => "%A, %-d de %B de %Y",
        _ => "%A %-d %B %Y",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_tags() {
        assert_eq!(DisplayLocale::parse("fr-FR").tag(), "fr_FR");
        assert_eq!(DisplayLocale::parse("FR_fr").tag(), "fr_FR");
        assert_eq!(DisplayLocale::parse("de").tag(), "de_DE");
        assert_eq!(DisplayLocale::parse("en").tag(), "en_US");
        assert_eq!(DisplayLocale::parse("en-GB").tag(), "en_GB");
    }

    #[test]
    fn unknown_falls_back_to_default() {
        assert_eq!(DisplayLocale::parse("xx-YY").tag(), "fr_FR");
        assert_eq!(DisplayLocale::parse("").tag(), "fr_FR");
    }

    #[test]
    fn full_date_shape_follows_language() {
        assert_eq!(DisplayLocale::parse("en-US").full_date_pattern(), "%A, %B %-d, %Y");
        assert_eq!(DisplayLocale::parse("en-GB").full_date_pattern(), "%A %-d %B %Y");
        assert_eq!(DisplayLocale::parse("es").full_date_pattern(), "%A, %-d de %B de %Y");
    }
}
