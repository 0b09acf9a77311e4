//! Schedule time handling.
//!
//! Schedule times are seconds since midnight on the service day. Services
//! that run past midnight use values beyond 86 400 (`25:30:00` is a valid
//! schedule time), so this module provides its own type rather than a
//! clock-time wrapper that stops at `23:59:59`.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized time format: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A point in time on the service day, in seconds since midnight.
///
/// Values beyond 86 400 are allowed and denote times on the following
/// calendar day (overnight services).
///
/// # Examples
///
/// ```
/// use transit_server::domain::ServiceTime;
///
/// let t = ServiceTime::parse("08:30:00").unwrap();
/// assert_eq!(t.seconds(), 8 * 3600 + 30 * 60);
/// assert_eq!(t.to_string(), "08:30:00");
///
/// // Past-midnight times are fine:
/// let late = ServiceTime::parse("25:15:00").unwrap();
/// assert_eq!(late.to_string(), "25:15:00");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceTime(u32);

impl ServiceTime {
    /// Midnight on the service day.
    pub const MIDNIGHT: ServiceTime = ServiceTime(0);

    /// Create a time from raw seconds since midnight.
    pub const fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Create a time from hour/minute/second components.
    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self(hours * 3600 + minutes * 60 + seconds)
    }

    /// Seconds since midnight.
    pub const fn seconds(self) -> u32 {
        self.0
    }

    /// This time shifted later by `seconds`, saturating at the maximum.
    pub const fn plus_seconds(self, seconds: u32) -> Self {
        Self(self.0.saturating_add(seconds))
    }

    /// Seconds elapsed since `earlier`, or `None` if `earlier` is later.
    pub fn duration_since(self, earlier: ServiceTime) -> Option<u32> {
        self.0.checked_sub(earlier.0)
    }

    /// Parse a time string.
    ///
    /// Exactly three shapes are accepted:
    ///
    /// - `HH:MM:SS` (eight characters, two colons),
    /// - `HH:MM` (five characters, one colon; seconds default to zero),
    /// - `"NN H MM M SS S"` duration syntax with one each of `H`, `M`, `S`.
    ///
    /// Hours are not capped at 23, matching schedule-time semantics.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::ServiceTime;
    ///
    /// assert_eq!(
    ///     ServiceTime::parse("12:34:56").unwrap().seconds(),
    ///     12 * 3600 + 34 * 60 + 56
    /// );
    /// assert_eq!(ServiceTime::parse("12:34").unwrap().seconds(), 12 * 3600 + 34 * 60);
    /// assert_eq!(ServiceTime::parse("1H 30M 0S").unwrap().seconds(), 5400);
    ///
    /// assert!(ServiceTime::parse("noon").is_err());
    /// assert!(ServiceTime::parse("12.34.56").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        if s.len() == 8 && s.bytes().filter(|&b| b == b':').count() == 2 {
            return Self::parse_hms(s);
        }
        if s.len() == 5 && s.bytes().filter(|&b| b == b':').count() == 1 {
            return Self::parse_hm(s);
        }
        if is_duration_shape(s) {
            return Self::parse_duration(s);
        }
        Err(TimeError::new("expected HH:MM:SS, HH:MM or 'NN H MM M SS S'"))
    }

    /// Parse `HH:MM:SS`.
    fn parse_hms(s: &str) -> Result<Self, TimeError> {
        let bytes = s.as_bytes();
        if bytes[2] != b':' || bytes[5] != b':' {
            return Err(TimeError::new("expected colons at positions 2 and 5"));
        }
        let hours =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minutes = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        let seconds = parse_two_digits(&bytes[6..8])
            .ok_or_else(|| TimeError::new("invalid second digits"))?;
        if minutes > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        if seconds > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }
        Ok(Self::from_hms(hours, minutes, seconds))
    }

    /// Parse `HH:MM`, treated as `HH:MM:00`.
    fn parse_hm(s: &str) -> Result<Self, TimeError> {
        let bytes = s.as_bytes();
        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }
        let hours =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minutes = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minutes > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        Ok(Self::from_hms(hours, minutes, 0))
    }

    /// Parse the `"NN H MM M SS S"` duration syntax.
    fn parse_duration(s: &str) -> Result<Self, TimeError> {
        let (hours, rest) = split_component(s, 'H')?;
        let (minutes, rest) = split_component(rest, 'M')?;
        let (seconds, rest) = split_component(rest, 'S')?;
        if !rest.trim().is_empty() {
            return Err(TimeError::new("trailing input after seconds component"));
        }
        Ok(Self::from_hms(hours, minutes, seconds))
    }
}

impl Add<u32> for ServiceTime {
    type Output = Self;

    fn add(self, seconds: u32) -> Self {
        self.plus_seconds(seconds)
    }
}

impl fmt::Debug for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceTime({self})")
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.0 / 3600,
            self.0 / 60 % 60,
            self.0 % 60
        )
    }
}

/// Check for the duration shape: exactly one each of `H`, `M` and `S`.
fn is_duration_shape(s: &str) -> bool {
    s.bytes().filter(|&b| b == b'H').count() == 1
        && s.bytes().filter(|&b| b == b'M').count() == 1
        && s.bytes().filter(|&b| b == b'S').count() == 1
}

/// Split off the number terminated by `marker`, returning it and the rest.
fn split_component(s: &str, marker: char) -> Result<(u32, &str), TimeError> {
    let pos = s
        .find(marker)
        .ok_or_else(|| TimeError::new("missing duration component"))?;
    let value = s[..pos]
        .trim()
        .parse::<u32>()
        .map_err(|_| TimeError::new("invalid duration digits"))?;
    Ok((value, &s[pos + 1..]))
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}
