//! Moments: UTC timestamps with millisecond precision, rendered
//! `<2026-08-02T12:34:56.789>`.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::ValueError;

const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// A point in time. Precision is truncated to whole milliseconds so the
/// canonical rendering is exact.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Moment(DateTime<Utc>);

impl Moment {
    /// The current time, truncated to milliseconds.
    pub fn now() -> Self {
        Self::from_millis(Utc::now().timestamp_millis())
            .expect("current time is representable")
    }

    /// Create from Unix milliseconds.
    pub fn from_millis(millis: i64) -> Result<Self, ValueError> {
        DateTime::<Utc>::from_timestamp_millis(millis)
            .map(Self)
            .ok_or(ValueError::InvalidMoment(millis.to_string()))
    }

    /// Unix milliseconds.
    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Parse the text form, without the angle brackets.
    pub fn from_text(text: &str) -> Result<Self, ValueError> {
        let naive = NaiveDateTime::parse_from_str(text, FORMAT)
            .map_err(|_| ValueError::InvalidMoment(text.to_string()))?;
        Ok(Self(naive.and_utc()))
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0.format(FORMAT))
    }
}

impl fmt::Debug for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Moment({self})")
    }
}
