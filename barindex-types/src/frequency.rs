//! Sampling frequency: a positive multiple of a calendar or clock unit.

use core::fmt;
use core::num::NonZeroU32;
use core::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::BarError;

/// Unit of a [`Frequency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum FrequencyUnit {
    /// Calendar day; steps land on the same wall-clock time on later dates.
    Day,
    /// Exact hour of elapsed time.
    Hour,
    /// Exact minute of elapsed time.
    Minute,
    /// Exact second of elapsed time.
    Second,
}

impl FrequencyUnit {
    /// Nominal length of one unit in seconds.
    #[must_use]
    pub const fn seconds(self) -> i64 {
        match self {
            Self::Day => 86_400,
            Self::Hour => 3_600,
            Self::Minute => 60,
            Self::Second => 1,
        }
    }

    /// Canonical tag used when formatting.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Day => "D",
            Self::Hour => "H",
            Self::Minute => "min",
            Self::Second => "S",
        }
    }

    // `m` and `M` are deliberately absent: they read as month as often as minute.
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "D" | "d" | "day" | "days" => Some(Self::Day),
            "H" | "h" | "hour" | "hours" => Some(Self::Hour),
            "min" | "T" | "minute" | "minutes" => Some(Self::Minute),
            "S" | "s" | "sec" | "second" | "seconds" => Some(Self::Second),
            _ => None,
        }
    }
}

/// A strictly positive sampling step.
///
/// Day-based frequencies advance calendar days in the session's own
/// timezone, so a daily grid anchored at 09:00 local stays at 09:00 local
/// across UTC offset changes. Hour, minute and second frequencies advance
/// absolute time uniformly.
///
/// Serializes as its canonical string form (`"1D"`, `"15min"`).
///
/// ```
/// use barindex_types::{Frequency, FrequencyUnit};
///
/// let f: Frequency = "15min".parse().unwrap();
/// assert_eq!(f.multiplier(), 15);
/// assert_eq!(f.unit(), FrequencyUnit::Minute);
/// assert_eq!(f.to_string(), "15min");
/// assert!("0H".parse::<Frequency>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Frequency {
    multiplier: NonZeroU32,
    unit: FrequencyUnit,
}

impl Frequency {
    /// One calendar day.
    pub const DAILY: Self = Self::unit_step(FrequencyUnit::Day);
    /// One hour.
    pub const HOURLY: Self = Self::unit_step(FrequencyUnit::Hour);
    /// One minute.
    pub const MINUTELY: Self = Self::unit_step(FrequencyUnit::Minute);

    const fn unit_step(unit: FrequencyUnit) -> Self {
        Self {
            multiplier: NonZeroU32::MIN,
            unit,
        }
    }

    /// Build a frequency from a multiplier and unit.
    ///
    /// # Errors
    /// Returns `InvalidFrequency` if `multiplier` is zero.
    pub fn new(multiplier: u32, unit: FrequencyUnit) -> Result<Self, BarError> {
        NonZeroU32::new(multiplier)
            .map(|multiplier| Self { multiplier, unit })
            .ok_or_else(|| {
                BarError::invalid_frequency(
                    format!("{multiplier}{}", unit.tag()),
                    "multiplier must be positive",
                )
            })
    }

    /// `n` calendar days.
    ///
    /// # Errors
    /// Returns `InvalidFrequency` if `n` is zero.
    pub fn days(n: u32) -> Result<Self, BarError> {
        Self::new(n, FrequencyUnit::Day)
    }

    /// `n` hours.
    ///
    /// # Errors
    /// Returns `InvalidFrequency` if `n` is zero.
    pub fn hours(n: u32) -> Result<Self, BarError> {
        Self::new(n, FrequencyUnit::Hour)
    }

    /// `n` minutes.
    ///
    /// # Errors
    /// Returns `InvalidFrequency` if `n` is zero.
    pub fn minutes(n: u32) -> Result<Self, BarError> {
        Self::new(n, FrequencyUnit::Minute)
    }

    /// `n` seconds.
    ///
    /// # Errors
    /// Returns `InvalidFrequency` if `n` is zero.
    pub fn seconds(n: u32) -> Result<Self, BarError> {
        Self::new(n, FrequencyUnit::Second)
    }

    /// Convert a structured duration into a clock frequency.
    ///
    /// The coarsest of hour, minute and second that divides `delta` exactly is
    /// chosen. The result is always a clock step: 24 hours stays `24H` and
    /// does not become a calendar day.
    ///
    /// # Errors
    /// Returns `InvalidFrequency` if `delta` is zero, negative, carries a
    /// sub-second component, or does not fit the multiplier range.
    pub fn from_time_delta(delta: TimeDelta) -> Result<Self, BarError> {
        if delta <= TimeDelta::zero() {
            return Err(BarError::invalid_frequency(
                delta.to_string(),
                "duration must be positive",
            ));
        }
        if delta.subsec_nanos() != 0 {
            return Err(BarError::invalid_frequency(
                delta.to_string(),
                "sub-second durations are not supported",
            ));
        }
        let secs = delta.num_seconds();
        let unit = if secs % FrequencyUnit::Hour.seconds() == 0 {
            FrequencyUnit::Hour
        } else if secs % FrequencyUnit::Minute.seconds() == 0 {
            FrequencyUnit::Minute
        } else {
            FrequencyUnit::Second
        };
        let multiplier = u32::try_from(secs / unit.seconds()).map_err(|_| {
            BarError::invalid_frequency(delta.to_string(), "duration is too large")
        })?;
        Self::new(multiplier, unit)
    }

    /// Parse a frequency such as `"1D"`, `"4H"`, `"30min"` or `"15S"`.
    ///
    /// Accepted unit tags: `D`/`d`/`day`/`days`, `H`/`h`/`hour`/`hours`,
    /// `min`/`T`/`minute`/`minutes` and `S`/`s`/`sec`/`second`/`seconds`.
    /// Surrounding whitespace is ignored and a missing multiplier means 1.
    ///
    /// # Errors
    /// Returns `InvalidFrequency` on an unknown unit tag, a zero or negative
    /// multiplier, or malformed syntax.
    pub fn parse(spec: &str) -> Result<Self, BarError> {
        let s = spec.trim();
        if s.is_empty() {
            return Err(BarError::invalid_frequency(spec, "empty frequency"));
        }
        if s.starts_with('-') {
            return Err(BarError::invalid_frequency(
                spec,
                "multiplier must be positive",
            ));
        }

        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, tag) = s.split_at(split);
        let tag = tag.trim_start();
        if tag.is_empty() {
            return Err(BarError::invalid_frequency(spec, "missing unit tag"));
        }
        let unit = FrequencyUnit::from_tag(tag).ok_or_else(|| {
            BarError::invalid_frequency(spec, format!("unknown unit tag {tag:?}"))
        })?;

        let multiplier = if digits.is_empty() {
            1
        } else {
            digits
                .parse::<u32>()
                .map_err(|_| BarError::invalid_frequency(spec, "multiplier is out of range"))?
        };
        let multiplier = NonZeroU32::new(multiplier)
            .ok_or_else(|| BarError::invalid_frequency(spec, "multiplier must be positive"))?;

        Ok(Self { multiplier, unit })
    }

    /// The positive multiplier.
    #[must_use]
    pub const fn multiplier(self) -> u32 {
        self.multiplier.get()
    }

    /// The unit being multiplied.
    #[must_use]
    pub const fn unit(self) -> FrequencyUnit {
        self.unit
    }

    /// True for day-based frequencies, which step in calendar days.
    #[must_use]
    pub const fn is_calendar(self) -> bool {
        matches!(self.unit, FrequencyUnit::Day)
    }

    /// Exact elapsed-time step for clock frequencies; `None` for calendar days.
    #[must_use]
    pub fn clock_step(self) -> Option<TimeDelta> {
        if self.is_calendar() {
            None
        } else {
            Some(self.nominal())
        }
    }

    /// Nominal length of one step, counting a day as 24 hours.
    #[must_use]
    pub fn nominal(self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.multiplier.get()) * self.unit.seconds())
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self::DAILY
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.multiplier, self.unit.tag())
    }
}

impl FromStr for Frequency {
    type Err = BarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Frequency {
    type Error = BarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Frequency> for String {
    fn from(f: Frequency) -> Self {
        f.to_string()
    }
}
