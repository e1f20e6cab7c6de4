//! barindex-core
//!
//! Core types, the session provider trait, and the bar index builder shared
//! across the barindex crates.
//!
//! - `types`: session, frequency, configuration and error types.
//! - `provider`: the `SessionProvider` trait and an in-memory `StaticSchedule`.
//! - `timeseries`: grid stepping, bar index construction and schedule merging.
//!
//! Everything here is synchronous and pure: the same sessions and
//! configuration always produce the same index, and no state is shared
//! between calls.
#![warn(missing_docs)]

/// Session provider trait and a static in-memory implementation.
pub mod provider;
/// Time-series utilities for building bar indexes over sessions.
pub mod timeseries;
pub mod types;

pub use provider::{SessionProvider, SessionStream, StaticSchedule, check_date_range};
pub use timeseries::merge::merge_sessions;
pub use timeseries::range::{Bars, bars, date_range, date_range_from_spec, try_bars};
pub use types::*;
