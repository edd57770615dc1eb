//! `WorkingDay`: one day-of-week's opening window.
//!
//! A [`WorkingDay`] answers two questions about an instant: is it valid
//! working time, and how far past the close of business has it run.  The
//! opening and closing marks are [`TimeOfDay`] values, which may be built
//! from the fractional-hour form used by calendar configuration.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use sla_core::errors::{Error, Result};
use sla_core::{fail, Minutes, MINUTES_PER_DAY, MINUTES_PER_HOUR};

use crate::weekday::Weekday;

/// A time of day with minute precision, from 00:00 up to and including
/// 24:00 (the end of the day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    /// Midnight at the start of the day.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Midnight at the end of the day (24:00).
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MINUTES_PER_DAY as u32);

    /// Build from minutes since midnight without range checks.
    pub(crate) const fn from_minutes_unchecked(minutes: u32) -> Self {
        TimeOfDay(minutes)
    }

    /// Build from an hour (0–24) and minute (0–59).
    ///
    /// # Errors
    /// Returns a configuration error if the value lies outside `[00:00, 24:00]`.
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if minute >= 60 {
            fail!("minute {minute} out of range [0, 59]");
        }
        let total = hour * 60 + minute;
        if total > Self::END_OF_DAY.0 {
            fail!("time of day {hour:02}:{minute:02} is past 24:00");
        }
        Ok(TimeOfDay(total))
    }

    /// Build from a fractional hour value such as `9.0` or `17.5`.
    ///
    /// The digits after the decimal point are read as a whole percentage of
    /// an hour, so `9.5` is 09:30 and `9.45` is 09:27
    /// (`round(45 / 100 * 60)`).  Fractions finer than a whole percent are
    /// rounded to one first.
    ///
    /// # Errors
    /// Returns a configuration error for non-finite, negative or > 24 values.
    pub fn from_fractional_hours(value: f64) -> Result<Self> {
        if !value.is_finite() || !(0.0..=24.0).contains(&value) {
            fail!("fractional hour {value} out of range [0, 24]");
        }
        let mut hour = value.trunc() as u32;
        let mut percent = ((value - value.trunc()) * 100.0).round() as u32;
        if percent == 100 {
            hour += 1;
            percent = 0;
        }
        Self::new(hour, (percent * 60 + 50) / 100)
    }

    /// Hour component (0–24).
    pub fn hour(&self) -> u32 {
        self.0 / 60
    }

    /// Minute component (0–59).
    pub fn minute(&self) -> u32 {
        self.0 % 60
    }

    /// Minutes elapsed since the start of the day.
    pub fn minutes_from_midnight(&self) -> Minutes {
        Minutes::from(self.0)
    }

    /// This time of day on `date`.  24:00 yields midnight of the next date.
    ///
    /// Returns `None` only for 24:00 on the last date chrono can represent.
    pub fn on(&self, date: NaiveDate) -> Option<NaiveDateTime> {
        date.and_time(NaiveTime::MIN)
            .checked_add_signed(Duration::minutes(self.minutes_from_midnight()))
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// The working profile of one day of the week.
///
/// A non-working day has zero working duration and never yields a valid
/// instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkingDay {
    weekday: Weekday,
    opening: TimeOfDay,
    closing: TimeOfDay,
    is_working: bool,
}

impl WorkingDay {
    /// Create a working profile.
    ///
    /// # Errors
    /// Returns a configuration error if `opening > closing`, or if the day is
    /// working and `opening == closing`.
    pub fn new(
        weekday: Weekday,
        opening: TimeOfDay,
        closing: TimeOfDay,
        is_working: bool,
    ) -> Result<Self> {
        if opening > closing || (is_working && opening == closing) {
            fail!("{weekday}: opening {opening} must precede closing {closing}");
        }
        Ok(Self {
            weekday,
            opening,
            closing,
            is_working,
        })
    }

    /// A working day whose window the caller has already validated.
    pub(crate) fn working_unchecked(
        weekday: Weekday,
        opening: TimeOfDay,
        closing: TimeOfDay,
    ) -> Self {
        debug_assert!(opening < closing);
        Self {
            weekday,
            opening,
            closing,
            is_working: true,
        }
    }

    /// A non-working day.
    pub fn closed(weekday: Weekday) -> Self {
        Self {
            weekday,
            opening: TimeOfDay::MIDNIGHT,
            closing: TimeOfDay::MIDNIGHT,
            is_working: false,
        }
    }

    /// The day of the week this profile describes.
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Opening time of day.
    pub fn opening(&self) -> TimeOfDay {
        self.opening
    }

    /// Closing time of day.
    pub fn closing(&self) -> TimeOfDay {
        self.closing
    }

    /// Whether the business is open on this day.
    pub fn is_working(&self) -> bool {
        self.is_working
    }

    /// Opening instant on `date`.
    ///
    /// # Errors
    /// Returns [`Error::Date`] if the instant is past the representable range.
    pub fn opening_on(&self, date: NaiveDate) -> Result<NaiveDateTime> {
        instant_on(self.opening, date)
    }

    /// Closing instant on `date`.
    ///
    /// # Errors
    /// Returns [`Error::Date`] if the instant is past the representable range.
    pub fn closing_on(&self, date: NaiveDate) -> Result<NaiveDateTime> {
        instant_on(self.closing, date)
    }

    /// Length of the working window in minutes; zero when not working.
    pub fn working_minutes(&self) -> Minutes {
        if !self.is_working {
            return 0;
        }
        self.closing.minutes_from_midnight() - self.opening.minutes_from_midnight()
    }

    /// Length of the working window as `(hours, minutes)`.
    pub fn working_time(&self) -> (Minutes, Minutes) {
        let total = self.working_minutes();
        (total / MINUTES_PER_HOUR, total % MINUTES_PER_HOUR)
    }

    /// First valid working instant at or after `instant` on the same date.
    ///
    /// * `None` if the day is not working or `instant` is at or past closing;
    /// * the opening instant if `instant` is at or before opening;
    /// * `instant` itself otherwise.
    pub fn valid_start_instant(&self, instant: NaiveDateTime) -> Option<NaiveDateTime> {
        if !self.is_working {
            return None;
        }
        let date = instant.date();
        // An unrepresentable close lies after every representable instant.
        if self.closing.on(date).is_some_and(|close| instant >= close) {
            return None;
        }
        match self.opening.on(date) {
            Some(open) if instant <= open => Some(open),
            _ => Some(instant),
        }
    }

    /// Minutes by which `instant` runs past closing on its own date, or 0.
    pub fn remaining_minutes_past_close(&self, instant: NaiveDateTime) -> Minutes {
        self.minutes_past_close_on(instant.date(), instant)
    }

    /// Minutes by which `instant` runs past closing on `date`, or 0.
    ///
    /// The calculator tracks the date a cursor was normalized on, which
    /// differs from `instant.date()` once an hour step crosses midnight.
    pub(crate) fn minutes_past_close_on(&self, date: NaiveDate, instant: NaiveDateTime) -> Minutes {
        match self.closing.on(date) {
            Some(close) if instant > close => (instant - close).num_minutes(),
            _ => 0,
        }
    }
}

fn instant_on(time: TimeOfDay, date: NaiveDate) -> Result<NaiveDateTime> {
    time.on(date)
        .ok_or_else(|| Error::Date(format!("{time} on {date} is out of range")))
}
