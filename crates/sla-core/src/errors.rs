//! Error types for slacalc.
//!
//! Every fallible operation in the workspace returns [`Result`], whose error
//! side is the single `thiserror`-derived [`Error`] enum below.  The
//! [`ensure!`](crate::ensure) and [`fail!`](crate::fail) macros cover the
//! common "check a precondition" and "bail out" cases.

use thiserror::Error;

/// The top-level error type used throughout slacalc.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Precondition violated (raised by `ensure!`).
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// A calendar, time-of-day or closure was built from invalid values.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No valid working instant can be reached from the requested start.
    #[error("unreachable working time: {0}")]
    UnreachableWorkingTime(String),

    /// The closure collaborator could not produce a snapshot.
    ///
    /// This is distinct from a successful fetch returning no closures.
    #[error("closure source failure for calendar '{calendar}': {reason}")]
    ClosureSource {
        /// The calendar identifier the lookup was made for.
        calendar: String,
        /// What went wrong.
        reason: String,
    },

    /// The closure reconciliation loop did not reach a fixed point.
    #[error("business time did not converge after {passes} passes")]
    NonConvergence {
        /// Number of passes executed before giving up.
        passes: usize,
    },

    /// Timestamp arithmetic left the representable range.
    #[error("date error: {0}")]
    Date(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Shorthand `Result` type used throughout slacalc.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use sla_core::{ensure, errors::Error};
/// fn non_negative(x: i64) -> sla_core::errors::Result<i64> {
///     ensure!(x >= 0, "x must be non-negative, got {x}");
///     Ok(x)
/// }
/// assert!(non_negative(1).is_ok());
/// assert!(non_negative(-1).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Configuration(...))` immediately.
///
/// # Example
/// ```
/// use sla_core::{fail, errors::Error};
/// fn always_err() -> sla_core::errors::Result<()> {
///     fail!("opening must precede closing");
/// }
/// assert!(matches!(always_err(), Err(Error::Configuration(_))));
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Configuration(format!($($msg)*)))
    };
}
