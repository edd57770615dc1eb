//! # slacalc
//!
//! Business-time deadline computation: add days, hours, and minutes of
//! *working* time to an instant, skipping non-working days, out-of-hours
//! periods, and ad-hoc closures such as office shutdowns.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `sla-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! slacalc = "0.1"
//! ```
//!
//! ```rust
//! use chrono::NaiveDate;
//! use slacalc::time::{BusinessTimeCalculator, ClosureInterval, ClosureSet, WorkingCalendar};
//!
//! let calendar = WorkingCalendar::default(); // Mon–Fri, 09:00–17:00
//! let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
//! let closures = ClosureSet::new(vec![ClosureInterval::new(
//!     monday.and_hms_opt(9, 0, 0).unwrap(),
//!     120,
//! )
//! .unwrap()]);
//!
//! let calc = BusinessTimeCalculator::new(&calendar, &closures, "head-office");
//! let due = calc
//!     .add_business_time(monday.and_hms_opt(8, 0, 0).unwrap(), 0, 3, 0)
//!     .unwrap();
//! assert_eq!(due, monday.and_hms_opt(14, 0, 0).unwrap());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use sla_core as core;

/// Working calendars, closures, and the business-time calculator.
pub use sla_time as time;

pub use sla_core::{Error, Result};
pub use sla_time::{BusinessOffset, BusinessTimeCalculator, WorkingCalendar};
