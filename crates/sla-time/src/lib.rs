//! # sla-time
//!
//! Working calendars, closures, and business-time arithmetic.
//!
//! The entry point is [`BusinessTimeCalculator`]: given a [`WorkingCalendar`]
//! and a [`ClosureSource`], it adds a [`BusinessOffset`] to an instant and
//! keeps extending the result until every closure falling inside the window
//! has been paid for.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Deadline computation and closure reconciliation.
pub mod business_time;

/// `WorkingCalendar`: the seven-day business week.
pub mod calendar;

/// Closure intervals and snapshots.
pub mod closure;

/// Where closure snapshots come from.
pub mod closure_source;

/// `BusinessOffset`: days, hours, and minutes of business time.
pub mod offset;

/// File and environment configuration.
pub mod settings;

/// `Weekday`: day of the week.
pub mod weekday;

/// `TimeOfDay` and `WorkingDay`.
pub mod working_day;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use business_time::{BusinessTimeCalculator, BusinessTimeOutcome, DEFAULT_MAX_PASSES};
pub use calendar::WorkingCalendar;
pub use closure::{ClosureInterval, ClosureSet};
pub use closure_source::{CalendarId, ClosureSource, InMemoryClosureSource};
pub use offset::BusinessOffset;
pub use settings::CalendarSettings;
pub use weekday::Weekday;
pub use working_day::{TimeOfDay, WorkingDay};
