//! Trading session: one open-to-close interval of a venue.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use chrono_tz::Tz;

use crate::BarError;

/// One trading session with timezone-aware open and close instants.
///
/// Fields are public so providers can build sessions freely; consumers in
/// `barindex-core` re-check `close > open` before using a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Session {
    /// Instant the session opens.
    pub open: DateTime<Tz>,
    /// Instant the session closes. Always after `open` for a valid session.
    pub close: DateTime<Tz>,
}

impl Session {
    /// Build a validated session.
    ///
    /// # Errors
    /// Returns `InvalidSession` unless `close > open`.
    pub fn new(open: DateTime<Tz>, close: DateTime<Tz>) -> Result<Self, BarError> {
        let session = Self { open, close };
        session.validate()?;
        Ok(session)
    }

    /// Check the `close > open` invariant.
    ///
    /// # Errors
    /// Returns `InvalidSession` if the close does not come after the open.
    pub fn validate(&self) -> Result<(), BarError> {
        if self.close > self.open {
            Ok(())
        } else {
            Err(BarError::invalid_session(&self.open, &self.close))
        }
    }

    /// Trading date of the session: the local calendar date of its open.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.open.date_naive()
    }

    /// Timezone the session open is expressed in.
    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.open.timezone()
    }

    /// Elapsed time between open and close.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.close.signed_duration_since(self.open)
    }

    /// Session open normalized to UTC.
    #[must_use]
    pub fn open_utc(&self) -> DateTime<Utc> {
        self.open.with_timezone(&Utc)
    }

    /// Session close normalized to UTC.
    #[must_use]
    pub fn close_utc(&self) -> DateTime<Utc> {
        self.close.with_timezone(&Utc)
    }
}
