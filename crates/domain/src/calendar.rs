// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar months and the per-day view of a room within one.

use crate::error::DomainError;
use crate::stay::{StayRange, format_iso_date};
use serde::{Deserialize, Serialize};
use time::{Date, Month};

/// A single calendar month, e.g. June 2025.
///
/// The month window is the half-open interval
/// `[first day of month, first day of next month)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarMonth {
    first_day: Date,
    next_first_day: Date,
}

impl CalendarMonth {
    /// Creates a calendar month from a year and a 1-based month number.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMonth` if the month number is not 1-12 or
    /// the year is outside the supported calendar.
    pub fn new(year: i32, month: u8) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidMonth { year, month };
        let month_value: Month = Month::try_from(month).map_err(|_| invalid())?;
        let first_day: Date =
            Date::from_calendar_date(year, month_value, 1).map_err(|_| invalid())?;

        let (next_year, next_month): (i32, Month) = if month_value == Month::December {
            (year.checked_add(1).ok_or_else(invalid)?, Month::January)
        } else {
            (year, month_value.next())
        };
        let next_first_day: Date =
            Date::from_calendar_date(next_year, next_month, 1).map_err(|_| invalid())?;

        Ok(Self {
            first_day,
            next_first_day,
        })
    }

    /// Returns the month containing `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the following month is not representable.
    pub fn containing(date: Date) -> Result<Self, DomainError> {
        Self::new(date.year(), u8::from(date.month()))
    }

    /// Returns the year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// Returns the month.
    #[must_use]
    pub const fn month(&self) -> Month {
        self.first_day.month()
    }

    /// Returns the 1-based month number.
    #[must_use]
    pub fn month_number(&self) -> u8 {
        u8::from(self.first_day.month())
    }

    /// Returns the first day of the month.
    #[must_use]
    pub const fn first_day(&self) -> Date {
        self.first_day
    }

    /// Returns the first day of the following month.
    #[must_use]
    pub const fn first_day_of_next_month(&self) -> Date {
        self.next_first_day
    }

    /// Returns the month as a half-open interval.
    #[must_use]
    pub const fn window(&self) -> StayRange {
        StayRange::from_ordered(self.first_day, self.next_first_day)
    }

    /// Returns the number of days in the month.
    #[must_use]
    pub fn days_in_month(&self) -> u8 {
        self.month().length(self.year())
    }

    /// Iterates over every day of the month.
    pub fn days(self) -> impl Iterator<Item = Date> {
        self.window().days()
    }

    /// Returns whether `date` falls within this month.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.window().contains_date(date)
    }

    /// Returns the preceding month.
    ///
    /// # Errors
    ///
    /// Returns an error if the preceding month is not representable.
    pub fn previous(&self) -> Result<Self, DomainError> {
        let last_day_of_previous: Date =
            self.first_day
                .previous_day()
                .ok_or_else(|| DomainError::DateArithmeticOverflow {
                    operation: format!("month before {self}"),
                })?;
        Self::containing(last_day_of_previous)
    }

    /// Returns the following month.
    ///
    /// # Errors
    ///
    /// Returns an error if the following month is not representable.
    pub fn next(&self) -> Result<Self, DomainError> {
        Self::containing(self.next_first_day)
    }
}

impl std::fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month_number())
    }
}

/// How a single day of a room appears on the admin calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    /// Nothing restricts the room on this day.
    Open,
    /// A guest reservation covers the day. Read-only on the calendar.
    Reserved {
        /// The covering restriction.
        restriction_id: i64,
        /// The reservation that owns the restriction.
        reservation_id: Option<i64>,
    },
    /// An owner block covers the day. Editable on the calendar.
    Blocked {
        /// The covering restriction.
        restriction_id: i64,
    },
}

impl DayState {
    /// Returns the lowercase label used in rendered views.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Reserved { .. } => "reserved",
            Self::Blocked { .. } => "blocked",
        }
    }
}

/// A key for a single calendar cell: a room on a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarCell {
    /// The room.
    pub room_id: i64,
    /// The day.
    pub date: Date,
}

impl std::fmt::Display for CalendarCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.room_id, format_iso_date(self.date))
    }
}

/// What an admin wants for one calendar cell after submitting the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockIntent {
    /// The cell is blocked and should stay blocked.
    Keep,
    /// The cell is blocked and should be cleared.
    Remove,
    /// The cell is open and should become blocked.
    Add,
}

impl BlockIntent {
    /// Returns the form value for this intent.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Remove => "remove",
            Self::Add => "add",
        }
    }

    /// Returns whether the admin wants the cell blocked afterwards.
    #[must_use]
    pub const fn wants_blocked(&self) -> bool {
        matches!(self, Self::Keep | Self::Add)
    }
}

impl std::str::FromStr for BlockIntent {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(Self::Keep),
            "remove" => Ok(Self::Remove),
            "add" => Ok(Self::Add),
            _ => Err(DomainError::InvalidBlockIntent(s.to_string())),
        }
    }
}
