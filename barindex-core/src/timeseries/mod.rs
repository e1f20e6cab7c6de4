//! Session-aware time-series utilities.
//!
//! Modules include:
//! - `grid`: stepping from a session open by a frequency
//! - `range`: the bar index builder (lazy and collected forms)
//! - `merge`: combine several venues' session schedules by trading date
/// Grid stepping anchored at a session open.
pub mod grid;
/// Merge utilities for joining multiple session schedules.
pub mod merge;
/// Bar index construction over ordered sessions.
pub mod range;
