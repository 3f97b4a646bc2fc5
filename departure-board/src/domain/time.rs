//! Wall-clock time of day for departure boards.
//!
//! The backend provides times as "HH:MM" strings with no date and no
//! timezone. Boards are always read against "now" on the same day, so the
//! type only tracks minutes since midnight.

use chrono::{NaiveTime, Timelike};
use std::fmt;
use std::ops::Sub;

/// Minutes in a full day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day with minute precision.
///
/// # Examples
///
/// ```
/// use departure_board::domain::TimeOfDay;
///
/// let t = TimeOfDay::parse_hhmm("11:02").unwrap();
/// assert_eq!(t.minute_of_day(), 662);
/// assert_eq!(t.to_string(), "11:02");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    /// Midnight.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { minutes: 0 };

    /// Create a time from hour and minute components.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, TimeError> {
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        Ok(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    /// Parse a time from "HH:MM" format (24-hour, zero padded).
    ///
    /// ```
    /// use departure_board::domain::TimeOfDay;
    ///
    /// assert!(TimeOfDay::parse_hhmm("00:00").is_ok());
    /// assert!(TimeOfDay::parse_hhmm("23:59").is_ok());
    ///
    /// assert!(TimeOfDay::parse_hhmm("1102").is_err());
    /// assert!(TimeOfDay::parse_hhmm("11:2").is_err());
    /// assert!(TimeOfDay::parse_hhmm("24:00").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        // Must be exactly 5 characters: HH:MM
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();

        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;

        Self::from_hm(hour, minute)
    }

    /// Truncate a chrono time to minute precision.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self {
            minutes: (time.hour() * 60 + time.minute()) as u16,
        }
    }

    /// The current local wall-clock time.
    pub fn now_local() -> Self {
        Self::from_naive_time(chrono::Local::now().time())
    }

    /// Minutes elapsed since midnight (0..1440).
    pub fn minute_of_day(&self) -> u16 {
        self.minutes
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u16 {
        self.minutes / 60
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u16 {
        self.minutes % 60
    }

    /// Signed minutes from `now` until `self` on the same day.
    ///
    /// Negative when `self` is earlier than `now`. No day rollover is
    /// applied.
    pub fn minutes_until(&self, now: TimeOfDay) -> i32 {
        i32::from(self.minutes) - i32::from(now.minutes)
    }

    /// Minutes from `now` until the next occurrence of `self`.
    ///
    /// Treats a time earlier than `now` as tomorrow, so the result is
    /// always in `0..1440`.
    pub fn minutes_until_wrapping(&self, now: TimeOfDay) -> u16 {
        let diff = self.minutes_until(now).rem_euclid(i32::from(MINUTES_PER_DAY));
        diff as u16
    }
}

impl Sub for TimeOfDay {
    type Output = i32;

    /// Signed minute difference, `self - rhs`.
    fn sub(self, rhs: Self) -> Self::Output {
        self.minutes_until(rhs)
    }
}

impl fmt::Debug for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeOfDay({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
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


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_time()(hour in 0u32..24, minute in 0u32..60) -> String {
            format!("{:02}:{:02}", hour, minute)
        }
    }

    proptest! {
        /// Parse then display returns the original string
        #[test]
        fn parse_display_roundtrip(s in valid_time()) {
            let time = TimeOfDay::parse_hhmm(&s).unwrap();
            prop_assert_eq!(time.to_string(), s);
        }

        #[test]
        fn invalid_hour_rejected(hour in 24u32..100, minute in 0u32..60) {
            let s = format!("{:02}:{:02}", hour, minute);
            prop_assert!(TimeOfDay::parse_hhmm(&s).is_err());
        }

        /// Signed difference is antisymmetric
        #[test]
        fn minutes_until_antisymmetric(a in valid_time(), b in valid_time()) {
            let a = TimeOfDay::parse_hhmm(&a).unwrap();
            let b = TimeOfDay::parse_hhmm(&b).unwrap();
            prop_assert_eq!(a.minutes_until(b), -b.minutes_until(a));
        }

        /// Wrapping difference agrees with the signed one modulo a day
        #[test]
        fn wrapping_consistent_with_signed(a in valid_time(), b in valid_time()) {
            let a = TimeOfDay::parse_hhmm(&a).unwrap();
            let b = TimeOfDay::parse_hhmm(&b).unwrap();
            let wrapped = i32::from(a.minutes_until_wrapping(b));
            let signed = a.minutes_until(b);
            prop_assert!(wrapped < i32::from(MINUTES_PER_DAY));
            prop_assert_eq!((wrapped - signed).rem_euclid(i32::from(MINUTES_PER_DAY)), 0);
        }
    }
}
