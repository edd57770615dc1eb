//! Retrieval of closure snapshots from the host system.
//!
//! The calculator never knows where closures are stored.  It is handed a
//! [`ClosureSource`] and asks it for a fresh [`ClosureSet`] each time it
//! needs one.

use std::collections::HashMap;

use sla_core::errors::{Error, Result};

use crate::closure::ClosureSet;

/// Opaque identifier of a closure calendar (e.g. an organisation's business
/// closure calendar).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarId(String);

impl CalendarId {
    /// Wrap a host identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CalendarId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CalendarId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CalendarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A synchronous, read-only source of closure snapshots.
///
/// An `Err` means the closures could not be retrieved and the calculation
/// must not proceed; an empty [`ClosureSet`] means there are none.
pub trait ClosureSource: Send + Sync {
    /// Return the current closures recorded for `calendar`.
    fn fetch(&self, calendar: &CalendarId) -> Result<ClosureSet>;
}

/// A fixed snapshot serves every calendar identifier.
impl ClosureSource for ClosureSet {
    fn fetch(&self, _calendar: &CalendarId) -> Result<ClosureSet> {
        Ok(self.clone())
    }
}

impl<F> ClosureSource for F
where
    F: Fn(&CalendarId) -> Result<ClosureSet> + Send + Sync,
{
    fn fetch(&self, calendar: &CalendarId) -> Result<ClosureSet> {
        self(calendar)
    }
}

/// Closure snapshots keyed by calendar identifier.
///
/// Looking up an unknown identifier is a fetch failure, not an empty set.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClosureSource {
    calendars: HashMap<CalendarId, ClosureSet>,
}

impl InMemoryClosureSource {
    /// An empty source with no calendars registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the closures for `calendar`.
    pub fn insert(&mut self, calendar: impl Into<CalendarId>, closures: ClosureSet) {
        self.calendars.insert(calendar.into(), closures);
    }
}

impl ClosureSource for InMemoryClosureSource {
    fn fetch(&self, calendar: &CalendarId) -> Result<ClosureSet> {
        self.calendars
            .get(calendar)
            .cloned()
            .ok_or_else(|| Error::ClosureSource {
                calendar: calendar.to_string(),
                reason: "no closure calendar registered under this identifier".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_calendar_is_an_error() {
        let mut source = InMemoryClosureSource::new();
        source.insert("org-1", ClosureSet::empty());

        assert!(source.fetch(&"org-1".into()).unwrap().is_empty());
        let err = source.fetch(&"org-2".into()).unwrap_err();
        assert!(matches!(err, Error::ClosureSource { ref calendar, .. } if calendar == "org-2"));
    }

    #[test]
    fn closures_as_source() {
        let failing = |id: &CalendarId| -> Result<ClosureSet> {
            Err(Error::ClosureSource {
                calendar: id.to_string(),
                reason: "store unavailable".into(),
            })
        };
        assert!(failing.fetch(&CalendarId::new("x")).is_err());
        assert!(ClosureSet::empty().fetch(&CalendarId::new("x")).unwrap().is_empty());
    }
}
