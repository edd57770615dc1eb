//! Closure intervals: holidays, outages and other periods during which
//! otherwise valid working time does not count.
//!
//! A [`ClosureSet`] is a point-in-time snapshot of the closures recorded for
//! one calendar.  It answers which closures overlap a window and how much
//! configured working time each of them swallows.

use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sla_core::errors::{Error, Result};
use sla_core::{fail, Minutes};

use crate::calendar::WorkingCalendar;
use crate::offset::BusinessOffset;

/// One closure record: a start instant and a duration in minutes.
///
/// The closure covers the half-open interval `[start, start + duration)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ClosureRecord")]
pub struct ClosureInterval {
    start: NaiveDateTime,
    #[serde(rename = "duration")]
    duration_minutes: Minutes,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

/// Wire form of a closure, validated into a [`ClosureInterval`].
#[derive(Deserialize)]
struct ClosureRecord {
    start: NaiveDateTime,
    duration: Minutes,
    #[serde(default)]
    label: Option<String>,
}

impl TryFrom<ClosureRecord> for ClosureInterval {
    type Error = Error;

    fn try_from(record: ClosureRecord) -> Result<Self> {
        let closure = Self::new(record.start, record.duration)?;
        Ok(match record.label {
            Some(label) => closure.with_label(label),
            None => closure,
        })
    }
}

impl ClosureInterval {
    /// Create a closure starting at `start` and lasting `duration_minutes`.
    ///
    /// # Errors
    /// Returns a configuration error for a negative duration, or one whose
    /// end is not representable.
    pub fn new(start: NaiveDateTime, duration_minutes: Minutes) -> Result<Self> {
        if duration_minutes < 0 {
            fail!("closure at {start} has negative duration {duration_minutes}");
        }
        if start
            .checked_add_signed(Duration::minutes(duration_minutes))
            .is_none()
        {
            fail!("closure at {start} lasting {duration_minutes} minutes overflows");
        }
        Ok(Self {
            start,
            duration_minutes,
            label: None,
        })
    }

    /// Attach the record's name in the host system.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Start instant (inclusive).
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// End instant (exclusive).
    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::minutes(self.duration_minutes)
    }

    /// Duration in minutes.
    pub fn duration_minutes(&self) -> Minutes {
        self.duration_minutes
    }

    /// The record's name, if the host supplied one.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Return `true` if `instant` lies in `[start, end)`.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end()
    }

    /// Return `true` if the closure touches the closed window `[from, to]`:
    /// it starts inside the window, ends inside it, or spans it entirely.
    pub fn overlaps(&self, from: NaiveDateTime, to: NaiveDateTime) -> bool {
        let end = self.end();
        (from <= self.start && self.start <= to)
            || (from <= end && end <= to)
            || (self.start < from && end > to)
    }

    /// Working time configured in `calendar` that falls inside this closure.
    ///
    /// A closure within one calendar day yields the overlap with that day's
    /// window, or one full day when the window is covered entirely.  A
    /// closure spanning several dates adds, for every visited date whose
    /// profile accepts the closure's start instant, the overlap computed
    /// against the *first* date's window.
    ///
    /// # Errors
    /// Returns [`Error::Date`] if a working window falls outside the
    /// representable range.
    pub fn consumed_working_time(&self, calendar: &WorkingCalendar) -> Result<BusinessOffset> {
        let end = self.end();
        let first_date = self.start.date();

        if first_date == end.date() {
            let day = calendar.day_for(self.start);
            if day.valid_start_instant(self.start).is_none() {
                return Ok(BusinessOffset::ZERO);
            }
            return Ok(consumed_in_window(
                day.opening_on(first_date)?,
                day.closing_on(first_date)?,
                self.start,
                end,
            ));
        }

        let mut consumed = BusinessOffset::ZERO;
        let mut counter = self.start;
        while counter < end {
            let visited = calendar.day_for(counter);
            if visited.valid_start_instant(self.start).is_some() {
                consumed += consumed_in_window(
                    visited.opening_on(first_date)?,
                    visited.closing_on(first_date)?,
                    self.start,
                    end,
                );
            }
            counter = match counter.date().succ_opt() {
                Some(next) => next.and_time(NaiveTime::MIN),
                None => break,
            };
        }
        Ok(consumed)
    }
}

/// Working time shared by the business window `[open, close)` and the
/// closure `[closure_start, closure_end)`.
fn consumed_in_window(
    open: NaiveDateTime,
    close: NaiveDateTime,
    closure_start: NaiveDateTime,
    closure_end: NaiveDateTime,
) -> BusinessOffset {
    if open > closure_end || close < closure_start {
        return BusinessOffset::ZERO;
    }
    if open >= closure_start && close <= closure_end {
        return BusinessOffset::one_day();
    }
    let from = open.max(closure_start);
    let to = close.min(closure_end);
    BusinessOffset::from_minutes((to - from).num_minutes())
}

/// A snapshot of closure records for one calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClosureSet {
    closures: Vec<ClosureInterval>,
}

impl ClosureSet {
    /// Create a snapshot from closure records.
    pub fn new(closures: Vec<ClosureInterval>) -> Self {
        Self { closures }
    }

    /// An empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a closure record.
    pub fn push(&mut self, closure: ClosureInterval) {
        self.closures.push(closure);
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.closures.len()
    }

    /// Return `true` if the snapshot holds no records.
    pub fn is_empty(&self) -> bool {
        self.closures.is_empty()
    }

    /// Iterate over all records.
    pub fn iter(&self) -> impl Iterator<Item = &ClosureInterval> {
        self.closures.iter()
    }

    /// Every distinct closure touching the closed window `[from, to]`
    /// (see [`ClosureInterval::overlaps`]).  Duplicate records appear once.
    pub fn closures_overlapping(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Vec<&ClosureInterval> {
        let mut seen = HashSet::new();
        self.closures
            .iter()
            .filter(|c| c.overlaps(from, to))
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Return `true` if any closure covers `instant`.
    pub fn contains_instant(&self, instant: NaiveDateTime) -> bool {
        self.closures.iter().any(|c| c.contains(instant))
    }

    /// The latest end among closures covering `instant`, if any.
    pub fn latest_end_covering(&self, instant: NaiveDateTime) -> Option<NaiveDateTime> {
        self.closures
            .iter()
            .filter(|c| c.contains(instant))
            .map(ClosureInterval::end)
            .max()
    }
}

impl FromIterator<ClosureInterval> for ClosureSet {
    fn from_iter<I: IntoIterator<Item = ClosureInterval>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
