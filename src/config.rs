use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::{
    locale::DEFAULT_LOCALE,
    zone::{current_zone, ZoneId},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Display
    pub tz: ZoneId,
    pub locale: String,

    // watch
    pub watch_interval_secs: u64,
}

fn flag(raw: Option<String>, default: bool) -> bool {
    match raw.map(|s| s.trim().to_lowercase()) {
        None => default,
        Some(v) if v.is_empty() => default,
        Some(v) if v == "1" || v == "true" || v == "yes" || v == "y" || v == "on" => true,
        Some(v) if v == "0" || v == "false" || v == "no" || v == "n" || v == "off" => false,
        Some(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // An explicitly configured zone must be valid; only an absent one
        // falls back to the host zone.
        let tz = match get("TIMEKEYS_TZ").filter(|s| !s.trim().is_empty()) {
            Some(name) => ZoneId::parse(name.trim())
                .map_err(|e| anyhow!("TIMEKEYS_TZ: {e}"))?,
            None => current_zone(),
        };

        let locale = get("TIMEKEYS_LOCALE")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        let watch_secs = get("TIMEKEYS_WATCH_SECS").filter(|s| !s.trim().is_empty());
        let watch_interval_secs = match watch_secs {
            None => 60,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| anyhow!("TIMEKEYS_WATCH_SECS is not a number: {raw:?}"))?,
        };
        if watch_interval_secs == 0 {
            return Err(anyhow!("TIMEKEYS_WATCH_SECS must be greater than 0"));
        }

        Ok(Self {
            tz,
            locale,
            watch_interval_secs,
        })
    }
}

/// Read before the config loads so startup errors are logged in the right
/// format.
pub fn log_json_from_env() -> bool {
    log_json(|key| std::env::var(key).ok())
}

fn log_json(get: impl Fn(&str) -> Option<String>) -> bool {
    flag(get("TIMEKEYS_LOG_JSON"), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.locale, "fr-FR");
        assert_eq!(cfg.watch_interval_secs, 60);
        assert!(!cfg.tz.name().is_empty());
    }

    #[test]
    fn explicit_values() {
        let cfg = Config::from_lookup(lookup(&[
            ("TIMEKEYS_TZ", "Europe/Paris"),
            ("TIMEKEYS_LOCALE", "en-GB"),
            ("TIMEKEYS_WATCH_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(cfg.tz.name(), "Europe/Paris");
        assert_eq!(cfg.locale, "en-GB");
        assert_eq!(cfg.watch_interval_secs, 5);
    }

    #[test]
    fn empty_interval_means_default() {
        let cfg = Config::from_lookup(lookup(&[("TIMEKEYS_WATCH_SECS", "  ")])).unwrap();
        assert_eq!(cfg.watch_interval_secs, 60);
    }

    #[test]
    fn log_json_flag() {
        assert!(!log_json(lookup(&[])));
        assert!(log_json(lookup(&[("TIMEKEYS_LOG_JSON", "yes")])));
        assert!(!log_json(lookup(&[("TIMEKEYS_LOG_JSON", "off")])));
    }

    #[test]
    fn invalid_zone_is_a_startup_error() {
        let err = Config::from_lookup(lookup(&[("TIMEKEYS_TZ", "Not/AZone")])).unwrap_err();
        assert!(err.to_string().contains("Not/AZone"));
    }

    #[test]
    fn zero_interval_rejected() {
        assert!(Config::from_lookup(lookup(&[("TIMEKEYS_WATCH_SECS", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("TIMEKEYS_WATCH_SECS", "soon")])).is_err());
    }
}
