// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Half-open date intervals.
//!
//! Every stay, reservation and block in the system is a `[start, end)`
//! interval of calendar days: the first day is occupied, the last day is not.
//! A guest checking out on the 12th therefore leaves the 12th free for the
//! next check-in.

use crate::error::DomainError;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parses an ISO 8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_iso_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), ISO_DATE).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_iso_date(date: Date) -> String {
    // a calendar date always carries every component the description names
    date.format(ISO_DATE).unwrap_or_else(|_| date.to_string())
}

/// Returns the day after `date`.
///
/// # Errors
///
/// Returns an error if `date` is the last representable day.
pub fn next_day(date: Date) -> Result<Date, DomainError> {
    date.next_day()
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("day after {}", format_iso_date(date)),
        })
}

/// A half-open interval of calendar days `[start, end)`.
///
/// Construction enforces `start < end`, so every value of this type is a
/// non-empty interval. Callers at the system boundary build a `StayRange`
/// from user input; everything below the boundary trusts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StayRange {
    start: Date,
    end: Date,
}

impl StayRange {
    /// Creates a new interval.
    ///
    /// # Arguments
    ///
    /// * `start` - The first occupied day
    /// * `end` - The first day after the interval
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` unless `start < end`.
    pub fn new(start: Date, end: Date) -> Result<Self, DomainError> {
        if start >= end {
            return Err(DomainError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates an interval the caller already knows is ordered.
    pub(crate) const fn from_ordered(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    /// Creates the one-day interval `[date, date + 1)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `date` is the last representable day.
    pub fn single_day(date: Date) -> Result<Self, DomainError> {
        let end: Date = next_day(date)?;
        Ok(Self { start: date, end })
    }

    /// Parses an interval from two `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns an error if either date is malformed or `start >= end`.
    pub fn parse(start: &str, end: &str) -> Result<Self, DomainError> {
        Self::new(parse_iso_date(start)?, parse_iso_date(end)?)
    }

    /// Returns the first day of the interval.
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Returns the exclusive end of the interval.
    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Returns whether two intervals share at least one day.
    ///
    /// Two half-open intervals overlap iff each one starts before the other
    /// ends. Touching intervals (`a.end == b.start`) do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns whether `date` falls inside the interval.
    #[must_use]
    pub fn contains_date(&self, date: Date) -> bool {
        self.start <= date && date < self.end
    }

    /// Returns the shared part of two intervals, if any.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Self {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    /// Returns the number of nights covered.
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.end - self.start).whole_days()
    }

    /// Iterates over every occupied day, in order.
    pub fn days(self) -> impl Iterator<Item = Date> {
        let end: Date = self.end;
        std::iter::successors(Some(self.start), |day| day.next_day())
            .take_while(move |day| *day < end)
    }
}

impl std::fmt::Display for StayRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {})",
            format_iso_date(self.start),
            format_iso_date(self.end)
        )
    }
}
