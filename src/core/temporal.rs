// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Calendar date, time-of-day, and combined datetime values.
//!
//! Components are individually optional: a zero day, month, or year means
//! the component is unset, so a month/year pair without a day is a valid
//! partial date. Fully specified dates are validated against the real
//! calendar (leap years included).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar date with individually optional components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Date {
    /// Year, 0 when unset
    pub year: u16,
    /// Month 1-12, 0 when unset
    pub month: u8,
    /// Day 1-31, 0 when unset
    pub day: u8,
}

impl Date {
    /// Create a date from year, month, and day.
    #[must_use]
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Check if every component is unset.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.year == 0 && self.month == 0 && self.day == 0
    }

    /// Check that the components form a representable date.
    ///
    /// Partial dates pass a range check only; fully specified dates are
    /// checked against the calendar.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        if self.month > 12 || self.day > 31 {
            return false;
        }
        if self.year != 0 && self.month != 0 && self.day != 0 {
            return NaiveDate::from_ymd_opt(
                i32::from(self.year),
                u32::from(self.month),
                u32::from(self.day),
            )
            .is_some();
        }
        true
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.day, self.month, self.year)
    }
}

/// Time of day with millisecond precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Time {
    /// Hour 0-23
    pub hour: u8,
    /// Minute 0-59
    pub minute: u8,
    /// Second 0-60 (60 allows a leap second)
    pub second: u8,
    /// Millisecond 0-999
    pub millisecond: u16,
}

impl Time {
    /// Create a time from hour, minute, second, and millisecond.
    #[must_use]
    pub const fn new(hour: u8, minute: u8, second: u8, millisecond: u16) -> Self {
        Self {
            hour,
            minute,
            second,
            millisecond,
        }
    }

    /// Check that every component is in range.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.hour <= 23 && self.minute <= 59 && self.second <= 60 && self.millisecond <= 999
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            self.hour, self.minute, self.second, self.millisecond
        )
    }
}

/// Combined date and time value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateTime {
    /// Date portion
    pub date: Date,
    /// Time portion
    pub time: Time,
}

impl DateTime {
    /// Create a datetime from a date and a time.
    #[must_use]
    pub const fn new(date: Date, time: Time) -> Self {
        Self { date, time }
    }

    /// Check that both portions are valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.date.is_valid() && self.time.is_valid()
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_valid() {
        assert!(Date::new(2023, 5, 14).is_valid());
        assert!(Date::new(2024, 2, 29).is_valid()); // leap year
        assert!(!Date::new(2023, 2, 29).is_valid());
        assert!(!Date::new(2023, 13, 1).is_valid());
        assert!(!Date::new(2023, 4, 31).is_valid());
    }

    #[test]
    fn test_date_partial() {
        // Month/year without a day is a valid partial date.
        assert!(Date::new(2023, 5, 0).is_valid());
        assert!(Date::new(0, 0, 14).is_valid());
        assert!(Date::default().is_valid());
        assert!(Date::default().is_unset());
        assert!(!Date::new(2023, 5, 14).is_unset());
    }

    #[test]
    fn test_date_display() {
        assert_eq!(Date::new(2023, 5, 14).to_string(), "14/05/2023");
    }

    #[test]
    fn test_time_valid() {
        assert!(Time::new(23, 59, 59, 999).is_valid());
        assert!(Time::new(12, 0, 60, 0).is_valid()); // leap second
        assert!(!Time::new(24, 0, 0, 0).is_valid());
        assert!(!Time::new(0, 60, 0, 0).is_valid());
        assert!(!Time::new(0, 0, 0, 1000).is_valid());
    }

    #[test]
    fn test_time_display() {
        assert_eq!(Time::new(9, 5, 3, 42).to_string(), "09:05:03.042");
    }

    #[test]
    fn test_datetime() {
        let dt = DateTime::new(Date::new(2023, 5, 14), Time::new(9, 30, 0, 0));
        assert!(dt.is_valid());
        assert_eq!(dt.to_string(), "14/05/2023 09:30:00.000");

        let bad = DateTime::new(Date::new(2023, 2, 30), Time::default());
        assert!(!bad.is_valid());
    }
}
