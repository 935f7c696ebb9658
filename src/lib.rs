//! Timezone-correct day keys, clock strings and relative-day labels.
//!
//! ```
//! use timekeys::{clock_string, date_key};
//!
//! let key = date_key("2024-01-15T23:00:00Z", "Europe/Paris").unwrap();
//! assert_eq!(key.to_string(), "2024-01-16");
//! assert_eq!(clock_string("2024-01-15T23:59:59Z", "UTC").unwrap(), "23:59:59");
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod instant;
pub mod keys;
pub mod locale;
pub mod monitoring;
pub mod tracker;
pub mod watch;
pub mod zone;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Result, TimeKeyError};
pub use format::{ChronoFormatter, DateFormatter, Pattern};
pub use instant::{Instant, IntoInstant};
pub use keys::{
    clock_string, date_key, date_label, parse_lines, time_of_day, today_key, DateKey, DateLabel,
    Snapshot, TimeKeys,
};
pub use locale::{DisplayLocale, DEFAULT_LOCALE};
pub use tracker::{DayChange, DayTracker};
pub use zone::{current_zone, AsZone, ZoneId};
