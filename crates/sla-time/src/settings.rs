//! Calendar configuration.
//!
//! [`CalendarSettings`] is what a host supplies to describe its business
//! week.  It is read from a file and/or `SLA_`-prefixed environment
//! variables and turned into a validated [`WorkingCalendar`] once, up front.

use std::path::Path;

use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use sla_core::errors::{Error, Result};

use crate::business_time::{BusinessTimeCalculator, DEFAULT_MAX_PASSES};
use crate::calendar::WorkingCalendar;
use crate::closure_source::{CalendarId, ClosureSource};
use crate::weekday::Weekday;
use crate::working_day::TimeOfDay;

/// Host-supplied description of the business week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// Opening hour shared by all working days, in fractional-hour form
    /// (see [`TimeOfDay::from_fractional_hours`]).
    pub opening_hour: f64,
    /// Closing hour shared by all working days, in fractional-hour form.
    pub closing_hour: f64,
    /// Days on which the business is closed.
    pub non_working_days: Vec<Weekday>,
    /// Hard cap on closure reconciliation passes.
    pub max_passes: usize,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            opening_hour: 9.0,
            closing_hour: 17.0,
            non_working_days: vec![Weekday::Saturday, Weekday::Sunday],
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl CalendarSettings {
    /// Load settings from `path` if it exists, then apply environment
    /// overrides such as `SLA_OPENING_HOUR=8.5` or
    /// `SLA_NON_WORKING_DAYS=Fri,Sat`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let builder = Config::builder().add_source(File::from(path.as_ref()).required(false));
        Self::build(builder)
    }

    /// Parse settings from a TOML document, then apply environment
    /// overrides.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        builder
            .add_source(
                Environment::with_prefix("SLA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("non_working_days"),
            )
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| Error::Configuration(e.to_string()))
    }

    /// Build the validated working calendar these settings describe.
    pub fn to_calendar(&self) -> Result<WorkingCalendar> {
        WorkingCalendar::with_hours(
            TimeOfDay::from_fractional_hours(self.opening_hour)?,
            TimeOfDay::from_fractional_hours(self.closing_hour)?,
            &self.non_working_days,
        )
    }

    /// A calculator over `calendar` honouring these settings' pass cap.
    pub fn calculator<'a>(
        &self,
        calendar: &'a WorkingCalendar,
        source: &'a dyn ClosureSource,
        calendar_id: impl Into<CalendarId>,
    ) -> BusinessTimeCalculator<'a> {
        BusinessTimeCalculator::new(calendar, source, calendar_id).with_max_passes(self.max_passes)
    }
}
