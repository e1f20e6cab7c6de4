//! Configuration types shared by the range builder and the orchestrator.

use serde::{Deserialize, Serialize};

use crate::{BarError, Frequency};

/// Which session ends may appear verbatim in a generated index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Closed {
    /// The open anchors the grid but is never reported; a grid point landing
    /// exactly on the close is reported.
    #[default]
    Right,
    /// The open is reported. A grid point landing exactly on the close is
    /// still reported; only the open end is affected by this mode.
    Left,
    /// Both ends are eligible.
    #[serde(alias = "none")]
    Both,
}

impl Closed {
    /// True if the session open itself is part of the output.
    #[must_use]
    pub const fn includes_open(self) -> bool {
        matches!(self, Self::Left | Self::Both)
    }
}

/// How several session schedules are combined by trading date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeHow {
    /// Keep dates present in every schedule; trade only while all are open.
    #[default]
    Inner,
    /// Keep dates present in any schedule; trade while any is open.
    Outer,
}

/// Parameters for one range construction.
///
/// Missing fields fall back to their defaults when deserializing:
///
/// ```
/// use barindex_types::{Closed, Frequency, RangeConfig};
///
/// let cfg: RangeConfig = serde_json::from_str(r#"{"frequency":"1H"}"#).unwrap();
/// assert_eq!(cfg.frequency, Frequency::HOURLY);
/// assert_eq!(cfg.closed, Closed::Right);
/// assert!(cfg.force_close);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Grid step anchored at each session open.
    pub frequency: Frequency,
    /// Boundary mode applied to the session open.
    pub closed: Closed,
    /// Guarantee each session's true close is present even off-grid.
    pub force_close: bool,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            frequency: Frequency::DAILY,
            closed: Closed::Right,
            force_close: true,
        }
    }
}

impl RangeConfig {
    /// Default configuration with the given frequency.
    #[must_use]
    pub const fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            closed: Closed::Right,
            force_close: true,
        }
    }

    /// Default configuration with a frequency parsed from `spec`.
    ///
    /// # Errors
    /// Returns `InvalidFrequency` if `spec` does not parse.
    pub fn parse(spec: &str) -> Result<Self, BarError> {
        Frequency::parse(spec).map(Self::new)
    }

    /// Set the boundary mode.
    #[must_use]
    pub const fn closed(mut self, closed: Closed) -> Self {
        self.closed = closed;
        self
    }

    /// Toggle close forcing.
    #[must_use]
    pub const fn force_close(mut self, yes: bool) -> Self {
        self.force_close = yes;
        self
    }
}
