use barindex_types::{BarError, Session};
use chrono::NaiveDate;
use chrono_tz::Tz;

/// Lazy, fallible stream of sessions in ascending order.
pub type SessionStream<'a> = Box<dyn Iterator<Item = Result<Session, BarError>> + Send + 'a>;

/// Source of trading sessions for a venue.
///
/// Implementations decide how sessions are derived (static tables, rule
/// sets, databases). Consumers only rely on the stream being ordered,
/// non-overlapping, and each session satisfying `close > open`.
pub trait SessionProvider: Send + Sync {
    /// Stable provider name used to tag errors.
    fn name(&self) -> &'static str;

    /// Reference timezone of the venue.
    ///
    /// Trading dates passed to [`sessions`](Self::sessions) are dates in this
    /// timezone, and callers use it to render UTC bars as local times.
    fn timezone(&self) -> Tz;

    /// Sessions whose trading date lies in `start..=end`, in ascending order.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `start > end`. Implementations may also fail
    /// with their own errors, either eagerly or as items of the stream.
    fn sessions(&self, start: NaiveDate, end: NaiveDate) -> Result<SessionStream<'_>, BarError>;
}

/// Reject inverted date ranges.
///
/// # Errors
/// Returns `InvalidArg` if `start > end`.
pub fn check_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), BarError> {
    if start > end {
        return Err(BarError::InvalidArg(format!(
            "start date {start} is after end date {end}"
        )));
    }
    Ok(())
}

/// In-memory session table.
///
/// Sessions are sorted and validated once at construction; queries slice the
/// table by trading date in the provider's timezone.
#[derive(Debug, Clone)]
pub struct StaticSchedule {
    name: &'static str,
    tz: Tz,
    sessions: Vec<Session>,
}

impl StaticSchedule {
    /// Build a schedule from sessions in any order.
    ///
    /// # Errors
    /// - `InvalidSession` if a session has `close <= open`.
    /// - `UnorderedSessions` if two sessions overlap.
    pub fn new<I>(name: &'static str, tz: Tz, sessions: I) -> Result<Self, BarError>
    where
        I: IntoIterator<Item = Session>,
    {
        let mut sessions: Vec<Session> = sessions.into_iter().collect();
        sessions.sort_by_key(|s| s.open);
        for s in &sessions {
            s.validate()?;
        }
        for w in sessions.windows(2) {
            if w[1].open < w[0].close {
                return Err(BarError::UnorderedSessions {
                    previous_close: w[0].close_utc(),
                    open: w[1].open_utc(),
                });
            }
        }
        Ok(Self { name, tz, sessions })
    }

    /// Number of sessions in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True if the table holds no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// All sessions in ascending order.
    #[must_use]
    pub fn as_slice(&self) -> &[Session] {
        &self.sessions
    }

    fn trading_date(&self, s: &Session) -> NaiveDate {
        s.open.with_timezone(&self.tz).date_naive()
    }
}

impl SessionProvider for StaticSchedule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn timezone(&self) -> Tz {
        self.tz
    }

    fn sessions(&self, start: NaiveDate, end: NaiveDate) -> Result<SessionStream<'_>, BarError> {
        check_date_range(start, end)?;
        let lo = self
            .sessions
            .partition_point(|s| self.trading_date(s) < start);
        Ok(Box::new(
            self.sessions[lo..]
                .iter()
                .take_while(move |s| self.trading_date(s) <= end)
                .copied()
                .map(Ok),
        ))
    }
}
