//! barindex builds session-aware bar indexes for trading venues.
//!
//! Overview
//! - A `SessionProvider` supplies a venue's trading sessions (open/close
//!   instants) for a date range; holidays, early closes and late opens are
//!   simply visible in those sessions.
//! - The range builder steps through each session from its open by the
//!   sampling frequency and returns the UTC instants at which a sampler
//!   should record a value.
//! - `BarIndex` binds a provider to a range configuration and exposes
//!   collected and lazy forms.
//!
//! Key behaviors and trade-offs
//! - Boundary mode (`Closed`):
//!   - `Right` (default): the open anchors the grid but is not reported.
//!   - `Left` / `Both`: the open is reported as the first instant of each session.
//! - Close forcing (default on): every session contributes its true close,
//!   even off-grid. Turning it off yields a pure grid but drops early closes
//!   that miss the grid.
//! - Day frequencies step in calendar days in the venue timezone, keeping
//!   the wall-clock time; hour/minute/second frequencies step in exact
//!   elapsed time.
//! - Failures abort the whole call. A malformed session is an error, never
//!   silently skipped.
//!
//! Examples
//! Building a daily index over a fixture calendar:
//! ```
//! use std::sync::Arc;
//! use barindex::{BarIndex, RangeConfig};
//! use barindex_mock::MockCalendar;
//! use chrono::NaiveDate;
//!
//! let index = BarIndex::builder()
//!     .with_provider(Arc::new(MockCalendar::fake_morning()))
//!     .config(RangeConfig::parse("1D")?)
//!     .build()?;
//!
//! let start = NaiveDate::from_ymd_opt(2012, 7, 2).unwrap();
//! let end = NaiveDate::from_ymd_opt(2012, 7, 4).unwrap();
//! // One forced close per session; 2012-07-03 closes early.
//! assert_eq!(index.range(start, end)?.len(), 3);
//! # Ok::<(), barindex::BarError>(())
//! ```
//!
//! Working directly on a session list:
//! ```
//! use barindex::{date_range, Closed, RangeConfig, Session};
//! use chrono::TimeZone;
//!
//! let tz = chrono_tz::Europe::London;
//! let s = Session::new(
//!     tz.with_ymd_and_hms(2024, 5, 7, 8, 0, 0).unwrap(),
//!     tz.with_ymd_and_hms(2024, 5, 7, 16, 30, 0).unwrap(),
//! )?;
//! let cfg = RangeConfig::parse("4H")?.closed(Closed::Both);
//! // 08:00, 12:00, 16:00 on the grid, then the forced 16:30 close.
//! assert_eq!(date_range([s], cfg)?.len(), 4);
//! # Ok::<(), barindex::BarError>(())
//! ```
//!
//! See `barindex/examples/` for a runnable demonstration.
#![warn(missing_docs)]

pub(crate) mod core;

pub use core::{BarIndex, BarIndexBuilder, tag_err};

// Re-export core types for convenience
pub use barindex_core::{
    BarError, Bars, Closed, Frequency, FrequencyUnit, MergeHow, RangeConfig, Session,
    SessionProvider, SessionStream, StaticSchedule, Tz, bars, date_range, date_range_from_spec,
    merge_sessions, try_bars,
};
