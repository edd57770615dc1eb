//! `WorkingCalendar`: the weekly working-day model.
//!
//! A calendar is exactly seven [`WorkingDay`] profiles, one per day of the
//! week.  It is built and validated once, then shared read-only by every
//! calculation that uses it.

use chrono::{NaiveDateTime, NaiveTime};
use sla_core::errors::{Error, Result};
use sla_core::{fail, Minutes};
use tracing::trace;

use crate::weekday::Weekday;
use crate::working_day::{TimeOfDay, WorkingDay};

/// Weekly working calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCalendar {
    days: [WorkingDay; 7],
}

impl WorkingCalendar {
    /// Build a calendar from seven profiles, Monday first.
    ///
    /// # Errors
    /// Returns a configuration error if the profiles are not ordered Monday
    /// to Sunday, or if no day is a working day.
    pub fn new(days: [WorkingDay; 7]) -> Result<Self> {
        for (day, expected) in days.iter().zip(Weekday::ALL) {
            if day.weekday() != expected {
                fail!(
                    "calendar slot for {expected} holds the profile of {}",
                    day.weekday()
                );
            }
        }
        if !days.iter().any(WorkingDay::is_working) {
            fail!("all seven days are marked non-working");
        }
        Ok(Self { days })
    }

    /// Build a calendar whose working days share one opening window.
    ///
    /// # Errors
    /// Returns a configuration error if `opening >= closing` or if every day
    /// is listed in `non_working`.
    pub fn with_hours(
        opening: TimeOfDay,
        closing: TimeOfDay,
        non_working: &[Weekday],
    ) -> Result<Self> {
        let mut days = Weekday::ALL.map(WorkingDay::closed);
        for (slot, weekday) in days.iter_mut().zip(Weekday::ALL) {
            if !non_working.contains(&weekday) {
                *slot = WorkingDay::new(weekday, opening, closing, true)?;
            }
        }
        Self::new(days)
    }

    /// Monday to Friday, opening and closing given as fractional hours
    /// (see [`TimeOfDay::from_fractional_hours`]).
    pub fn from_fractional_hours(opening: f64, closing: f64) -> Result<Self> {
        Self::with_hours(
            TimeOfDay::from_fractional_hours(opening)?,
            TimeOfDay::from_fractional_hours(closing)?,
            &[Weekday::Saturday, Weekday::Sunday],
        )
    }

    /// The profile for a day of the week.
    pub fn day(&self, weekday: Weekday) -> &WorkingDay {
        &self.days[weekday.index()]
    }

    /// The profile for the day of the week `instant` falls on.
    pub fn day_for(&self, instant: NaiveDateTime) -> &WorkingDay {
        self.day(Weekday::of(instant))
    }

    /// The profile following `day`, wrapping from Sunday to Monday.
    pub fn next_day(&self, day: &WorkingDay) -> &WorkingDay {
        self.day(day.weekday().succ())
    }

    /// Working duration of a day of the week as `(hours, minutes)`.
    pub fn working_time(&self, weekday: Weekday) -> (Minutes, Minutes) {
        self.day(weekday).working_time()
    }

    /// Iterate over the seven profiles, Monday first.
    pub fn days(&self) -> impl Iterator<Item = &WorkingDay> {
        self.days.iter()
    }

    /// Whether `instant` is itself a valid working instant.
    pub fn is_valid_instant(&self, instant: NaiveDateTime) -> bool {
        self.day_for(instant).valid_start_instant(instant) == Some(instant)
    }

    /// First valid working instant at or after `instant`, with its profile.
    ///
    /// Days that are non-working, or whose close has already passed, are
    /// skipped one at a time until a working day is found; the result is
    /// snapped to opening if it would otherwise precede it.
    ///
    /// # Errors
    /// Returns [`Error::UnreachableWorkingTime`] if no working instant exists
    /// within the following week, or if the walk leaves the representable
    /// date range.
    pub fn next_valid_instant(
        &self,
        instant: NaiveDateTime,
    ) -> Result<(NaiveDateTime, &WorkingDay)> {
        let mut cursor = instant;
        let mut day = self.day_for(cursor);
        for _ in 0..=7 {
            if let Some(valid) = day.valid_start_instant(cursor) {
                return Ok((valid, day));
            }
            let next_date = cursor.date().succ_opt().ok_or_else(|| {
                Error::UnreachableWorkingTime(format!("no working day after {cursor}"))
            })?;
            cursor = next_date.and_time(NaiveTime::MIN);
            day = self.next_day(day);
            trace!(%cursor, weekday = %day.weekday(), "skipped to next day");
        }
        Err(Error::UnreachableWorkingTime(format!(
            "no valid working instant within a week of {instant}"
        )))
    }
}

impl Default for WorkingCalendar {
    /// Monday to Friday, 09:00–17:00.
    fn default() -> Self {
        let open = TimeOfDay::from_minutes_unchecked(9 * 60);
        let close = TimeOfDay::from_minutes_unchecked(17 * 60);
        let mut days = Weekday::ALL.map(WorkingDay::closed);
        for slot in days.iter_mut().take(5) {
            *slot = WorkingDay::working_unchecked(slot.weekday(), open, close);
        }
        Self { days }
    }
}
