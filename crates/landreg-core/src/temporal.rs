//! # UTC Timestamps
//!
//! `Timestamp` is a UTC instant truncated to whole seconds. Deed ids embed
//! the issuing transaction's timestamp as Unix seconds, so sub-second
//! precision would only make two endorsers disagree.

use chrono::{DateTime, Timelike, Utc};

use crate::error::LandregError;

/// A UTC timestamp with seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated to seconds.
    pub fn now() -> Self {
        let now = Utc::now();
        Self(now.with_nanosecond(0).unwrap_or(now))
    }

    /// # Errors
    ///
    /// `Validation` if `secs` is outside the range chrono can represent.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, LandregError> {
        let dt = DateTime::from_timestamp(secs, 0).ok_or_else(|| {
            LandregError::Validation(format!("invalid Unix timestamp: {secs}"))
        })?;
        Ok(Self(dt))
    }

    /// Unix epoch seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }
}
