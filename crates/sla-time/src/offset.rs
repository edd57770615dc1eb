//! `BusinessOffset`: an amount of business time.

use sla_core::ensure;
use sla_core::errors::Result;
use sla_core::Minutes;

/// A quantity of business time expressed as days, hours and minutes.
///
/// A "day" means one working day's worth of work on whatever day it is
/// consumed, so offsets are never collapsed into a single minute count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BusinessOffset {
    /// Whole working days.
    pub days: Minutes,
    /// Working hours.
    pub hours: Minutes,
    /// Working minutes.
    pub minutes: Minutes,
}

impl BusinessOffset {
    /// The empty offset.
    pub const ZERO: BusinessOffset = BusinessOffset {
        days: 0,
        hours: 0,
        minutes: 0,
    };

    /// Create an offset from non-negative components.
    pub fn new(days: u32, hours: u32, minutes: u32) -> Self {
        Self {
            days: days.into(),
            hours: hours.into(),
            minutes: minutes.into(),
        }
    }

    /// Create an offset from signed components, as supplied by a host.
    ///
    /// # Errors
    /// Returns a precondition error if any component is negative.
    pub fn try_new(days: i64, hours: i64, minutes: i64) -> Result<Self> {
        ensure!(
            days >= 0 && hours >= 0 && minutes >= 0,
            "business offset must be non-negative, got {days}d {hours}h {minutes}m"
        );
        Ok(Self {
            days,
            hours,
            minutes,
        })
    }

    /// One full working day.
    pub fn one_day() -> Self {
        Self::new(1, 0, 0)
    }

    /// Split a minute count into `(0, hours, minutes)`.
    pub fn from_minutes(total: Minutes) -> Self {
        Self {
            days: 0,
            hours: total / 60,
            minutes: total % 60,
        }
    }

    /// Return `true` if every component is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl std::ops::Add for BusinessOffset {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            days: self.days + rhs.days,
            hours: self.hours + rhs.hours,
            minutes: self.minutes + rhs.minutes,
        }
    }
}

impl std::ops::AddAssign for BusinessOffset {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for BusinessOffset {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, o| acc + o)
    }
}

impl std::fmt::Display for BusinessOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d {}h {}m", self.days, self.hours, self.minutes)
    }
}
