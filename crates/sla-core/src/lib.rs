//! # sla-core
//!
//! Core types and error definitions for slacalc.
//!
//! This crate provides the building blocks shared by the other crates in the
//! workspace: primitive type aliases and the error hierarchy.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `fail!` macros.
pub mod errors;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// A signed count of minutes.
pub type Minutes = i64;

/// Minutes in one hour.
pub const MINUTES_PER_HOUR: Minutes = 60;

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: Minutes = 24 * MINUTES_PER_HOUR;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
