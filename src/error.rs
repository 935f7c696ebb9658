use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeKeyError {
    /// The zone is empty or not in the bundled IANA database.
    #[error("invalid timezone: {zone:?}")]
    InvalidTimezone { zone: String },

    #[error("invalid instant: {input:?}")]
    InvalidInstant { input: String },
}

impl TimeKeyError {
    pub fn invalid_timezone(zone: impl Into<String>) -> Self {
        Self::InvalidTimezone { zone: zone.into() }
    }

    pub fn invalid_instant(input: impl Into<String>) -> Self {
        Self::InvalidInstant { input: input.into() }
    }
}

pub type Result<T> = std::result::Result<T, TimeKeyError>;
