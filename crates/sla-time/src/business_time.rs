//! Business-time arithmetic.
//!
//! [`BusinessTimeCalculator`] adds an amount of business time to an instant.
//! One *pass* walks the [`WorkingCalendar`] forward, whole days first, then
//! hours, then minutes, skipping everything outside the working windows.
//! The closures touching the window `[pass start, cursor]` are then asked
//! how much working time they swallowed; if any, another pass adds that
//! amount starting from where the previous one stopped.
//!
//! Closures are re-queried on every pass, so a closure overlapping several
//! consecutive windows is charged on each of them.  The loop ends at the
//! first pass whose window costs nothing and whose end is not covered by a
//! closure.  A cursor left inside a closure that charges no working time
//! resumes from that closure's end.  Passes are capped by
//! [`BusinessTimeCalculator::with_max_passes`]; exceeding the cap is
//! [`Error::NonConvergence`].

use chrono::{Duration, NaiveDate, NaiveDateTime};
use sla_core::errors::{Error, Result};
use sla_core::{ensure, Minutes, MINUTES_PER_HOUR};
use tracing::{debug, trace, warn};

use crate::calendar::WorkingCalendar;
use crate::closure::ClosureSet;
use crate::closure_source::{CalendarId, ClosureSource};
use crate::offset::BusinessOffset;
use crate::working_day::WorkingDay;

/// Default hard cap on convergence passes.
pub const DEFAULT_MAX_PASSES: usize = 256;

/// Result of a calculation, with the bookkeeping of its convergence loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessTimeOutcome {
    /// The computed instant.
    pub deadline: NaiveDateTime,
    /// Number of passes run, including the final one that consumed nothing.
    pub passes: usize,
    /// Where the final pass started; its window is `[last_pass_start, deadline]`.
    pub last_pass_start: NaiveDateTime,
    /// Closure time charged over all passes.
    pub charged: BusinessOffset,
}

/// Adds business time to instants according to a working calendar and the
/// closures recorded for one closure calendar.
///
/// The calculator borrows its inputs and holds no mutable state, so one
/// instance can serve concurrent calculations.
pub struct BusinessTimeCalculator<'a> {
    calendar: &'a WorkingCalendar,
    source: &'a dyn ClosureSource,
    calendar_id: CalendarId,
    max_passes: usize,
}

impl std::fmt::Debug for BusinessTimeCalculator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusinessTimeCalculator")
            .field("calendar_id", &self.calendar_id)
            .field("max_passes", &self.max_passes)
            .finish()
    }
}

impl<'a> BusinessTimeCalculator<'a> {
    /// Create a calculator over `calendar`, reading closures for
    /// `calendar_id` from `source`.
    pub fn new(
        calendar: &'a WorkingCalendar,
        source: &'a dyn ClosureSource,
        calendar_id: impl Into<CalendarId>,
    ) -> Self {
        Self {
            calendar,
            source,
            calendar_id: calendar_id.into(),
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    /// Override the hard cap on convergence passes (at least one pass always
    /// runs).
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    /// The working calendar in use.
    pub fn calendar(&self) -> &WorkingCalendar {
        self.calendar
    }

    /// Add `days`, `hours` and `minutes` of business time to `start`.
    ///
    /// A zero offset yields the first valid working instant at or after
    /// `start`, after closure reconciliation.
    ///
    /// # Errors
    /// * [`Error::UnreachableWorkingTime`] if no working instant can be found;
    /// * [`Error::ClosureSource`] if the closures cannot be fetched;
    /// * [`Error::NonConvergence`] if reconciliation exceeds the pass cap.
    pub fn add_business_time(
        &self,
        start: NaiveDateTime,
        days: u32,
        hours: u32,
        minutes: u32,
    ) -> Result<NaiveDateTime> {
        self.add(start, BusinessOffset::new(days, hours, minutes))
    }

    /// Add `offset` to `start`.  See [`add_business_time`](Self::add_business_time).
    pub fn add(&self, start: NaiveDateTime, offset: BusinessOffset) -> Result<NaiveDateTime> {
        self.calculate(start, offset).map(|outcome| outcome.deadline)
    }

    /// Add `offset` to `start`, returning the convergence bookkeeping too.
    pub fn calculate(
        &self,
        start: NaiveDateTime,
        offset: BusinessOffset,
    ) -> Result<BusinessTimeOutcome> {
        ensure!(
            offset.days >= 0 && offset.hours >= 0 && offset.minutes >= 0,
            "business offset must be non-negative, got {offset}"
        );

        let mut pass_start = start;
        let mut pending = offset;
        let mut charged = BusinessOffset::ZERO;
        let mut pass = 0;
        loop {
            pass += 1;
            let cursor = CalculationState::begin(self.calendar, pass_start, pending)?.run()?;
            let closures = self.source.fetch(&self.calendar_id)?;
            let consumed = self.reconcile(&closures, pass_start, cursor)?;
            debug!(
                calendar = %self.calendar_id,
                pass,
                start = %pass_start,
                %cursor,
                %consumed,
                "business-time pass complete"
            );

            if consumed.is_zero() {
                let Some(resume) = closures.latest_end_covering(cursor) else {
                    return Ok(BusinessTimeOutcome {
                        deadline: cursor,
                        passes: pass,
                        last_pass_start: pass_start,
                        charged,
                    });
                };
                trace!(%cursor, %resume, "cursor inside a closure that charges no working time");
                pass_start = resume;
            } else {
                charged += consumed;
                pass_start = cursor;
            }
            pending = consumed;

            if pass >= self.max_passes {
                warn!(
                    calendar = %self.calendar_id,
                    passes = pass,
                    %charged,
                    "closure reconciliation did not converge"
                );
                return Err(Error::NonConvergence { passes: pass });
            }
        }
    }

    /// Working time swallowed by the closures touching `[from, to]`.
    ///
    /// Against the window of a finished calculation's last pass this is
    /// always zero.
    pub fn reconcile(
        &self,
        closures: &ClosureSet,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<BusinessOffset> {
        let mut consumed = BusinessOffset::ZERO;
        for closure in closures.closures_overlapping(from, to) {
            let time = closure.consumed_working_time(self.calendar)?;
            trace!(
                closure_start = %closure.start(),
                closure_end = %closure.end(),
                label = closure.label().unwrap_or_default(),
                %time,
                "charged closure"
            );
            consumed += time;
        }
        Ok(consumed)
    }
}

/// Mutable state of one pass.
///
/// `date` is the date the cursor was last normalized on: overflow past the
/// close is always measured against that date's closing instant, even after
/// an hour step has carried the cursor past midnight.
struct CalculationState<'c> {
    calendar: &'c WorkingCalendar,
    day: &'c WorkingDay,
    date: NaiveDate,
    cursor: NaiveDateTime,
    remaining: BusinessOffset,
}

impl<'c> CalculationState<'c> {
    fn begin(
        calendar: &'c WorkingCalendar,
        start: NaiveDateTime,
        offset: BusinessOffset,
    ) -> Result<Self> {
        let (cursor, day) = calendar.next_valid_instant(start)?;
        Ok(Self {
            calendar,
            day,
            date: cursor.date(),
            cursor,
            remaining: offset,
        })
    }

    fn run(mut self) -> Result<NaiveDateTime> {
        self.consume_days()?;
        self.normalize_hours()?;
        self.consume_minutes()?;
        // A walk may stop exactly on a closing instant.
        self.renormalize()?;
        Ok(self.cursor)
    }

    fn renormalize(&mut self) -> Result<()> {
        let (cursor, day) = self.calendar.next_valid_instant(self.cursor)?;
        self.cursor = cursor;
        self.day = day;
        self.date = cursor.date();
        Ok(())
    }

    /// Move the cursor one clock hour and return how far it ran past close.
    fn step_hour(&mut self) -> Result<Minutes> {
        self.cursor = shift(self.cursor, Duration::hours(1))?;
        Ok(self.day.minutes_past_close_on(self.date, self.cursor))
    }

    /// Step `hours` clock hours; minutes that ran past close are owed back
    /// and the cursor resumes at the next opening.
    fn step_hours(&mut self, hours: Minutes) -> Result<()> {
        for _ in 0..hours {
            let overflow = self.step_hour()?;
            if overflow > 0 {
                self.remaining.minutes += overflow;
                self.renormalize()?;
            }
        }
        Ok(())
    }

    // The cursor always sits on a working day here, so every iteration
    // consumes one day.
    fn consume_days(&mut self) -> Result<()> {
        while self.remaining.days > 0 {
            let (hours, minutes) = self.day.working_time();
            self.remaining.minutes += minutes;
            self.step_hours(hours)?;
            self.remaining.days -= 1;
        }
        Ok(())
    }

    fn normalize_hours(&mut self) -> Result<()> {
        loop {
            self.remaining.hours += self.remaining.minutes / MINUTES_PER_HOUR;
            self.remaining.minutes %= MINUTES_PER_HOUR;
            let hours = std::mem::take(&mut self.remaining.hours);
            self.step_hours(hours)?;
            if self.remaining.minutes < MINUTES_PER_HOUR {
                return Ok(());
            }
        }
    }

    fn consume_minutes(&mut self) -> Result<()> {
        while self.remaining.minutes > 0 {
            let overflow = self.step_hour()?;
            let worked = (MINUTES_PER_HOUR - overflow).max(0);
            if worked >= self.remaining.minutes {
                let unused = MINUTES_PER_HOUR - self.remaining.minutes;
                self.cursor = shift(self.cursor, -Duration::minutes(unused))?;
                self.remaining.minutes = 0;
            } else {
                self.renormalize()?;
                self.remaining.minutes -= worked;
            }
        }
        Ok(())
    }
}

fn shift(instant: NaiveDateTime, delta: Duration) -> Result<NaiveDateTime> {
    instant
        .checked_add_signed(delta)
        .ok_or_else(|| Error::Date(format!("{instant} shifted by {delta} is out of range")))
}
