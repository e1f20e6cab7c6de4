use core::iter::FusedIterator;

use barindex_types::{BarError, Closed, Frequency, RangeConfig, Session};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::grid::nth_point;

/// Grid walk over a single session.
struct SessionGrid {
    session: Session,
    frequency: Frequency,
    force_close: bool,
    next_k: u64,
    grid_done: bool,
    close_done: bool,
    last: Option<DateTime<Tz>>,
}

impl SessionGrid {
    fn new(session: Session, cfg: RangeConfig) -> Self {
        Self {
            session,
            frequency: cfg.frequency,
            force_close: cfg.force_close,
            // The grid is always anchored at the open; `right` only skips reporting it.
            next_k: u64::from(!cfg.closed.includes_open()),
            grid_done: false,
            close_done: false,
            last: None,
        }
    }

    fn next_point(&mut self) -> Option<DateTime<Tz>> {
        if !self.grid_done {
            let point = nth_point(self.session.open, self.frequency, self.next_k)
                .filter(|p| *p <= self.session.close);
            if let Some(p) = point {
                // `nth_point` is `None` long before `k` nears `u64::MAX`.
                self.next_k += 1;
                self.last = Some(p);
                return Some(p);
            }
            self.grid_done = true;
        }

        if self.force_close && !self.close_done {
            self.close_done = true;
            if self.last != Some(self.session.close) {
                self.last = Some(self.session.close);
                return Some(self.session.close);
            }
        }
        None
    }
}

/// Lazy bar index over a stream of sessions.
///
/// Yields UTC instants in strictly increasing order, one session at a time.
/// The first error ends the stream: an invalid session is reported instead of
/// being skipped, and nothing is yielded after it.
///
/// Built by [`bars`] or [`try_bars`].
pub struct Bars<I> {
    sessions: I,
    cfg: RangeConfig,
    current: Option<SessionGrid>,
    previous_close: Option<DateTime<Utc>>,
    last_emitted: Option<DateTime<Utc>>,
    done: bool,
}

/// Session iterator adapter used by [`bars`] for infallible inputs.
pub type InfallibleSessions<I> = core::iter::Map<I, fn(Session) -> Result<Session, BarError>>;

impl<I> Bars<I>
where
    I: Iterator<Item = Result<Session, BarError>>,
{
    fn new(sessions: I, cfg: RangeConfig) -> Self {
        Self {
            sessions,
            cfg,
            current: None,
            previous_close: None,
            last_emitted: None,
            done: false,
        }
    }

    /// Configuration this index is being built with.
    #[must_use]
    pub const fn config(&self) -> &RangeConfig {
        &self.cfg
    }

    fn admit(&mut self, session: Session) -> Result<Session, BarError> {
        if let Err(e) = session.validate() {
            #[cfg(feature = "tracing")]
            tracing::warn!(open = %session.open, close = %session.close, "rejecting session: close is not after open");
            return Err(e);
        }
        let open = session.open_utc();
        if let Some(previous_close) = self.previous_close {
            if open < previous_close {
                #[cfg(feature = "tracing")]
                tracing::warn!(%open, %previous_close, "rejecting session: opens before previous close");
                return Err(BarError::UnorderedSessions {
                    previous_close,
                    open,
                });
            }
        }
        self.previous_close = Some(session.close_utc());
        #[cfg(feature = "tracing")]
        tracing::trace!(open = %session.open, close = %session.close, "session admitted");
        Ok(session)
    }
}

impl<I> Iterator for Bars<I>
where
    I: Iterator<Item = Result<Session, BarError>>,
{
    type Item = Result<DateTime<Utc>, BarError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            if let Some(grid) = self.current.as_mut() {
                if let Some(point) = grid.next_point() {
                    let point = point.with_timezone(&Utc);
                    // A session opening exactly at the previous close shares that instant.
                    if self.last_emitted.is_some_and(|last| point <= last) {
                        continue;
                    }
                    self.last_emitted = Some(point);
                    return Some(Ok(point));
                }
                self.current = None;
            }

            let Some(next) = self.sessions.next() else {
                self.done = true;
                return None;
            };
            match next.and_then(|session| self.admit(session)) {
                Ok(session) => self.current = Some(SessionGrid::new(session, self.cfg)),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<I> FusedIterator for Bars<I> where I: Iterator<Item = Result<Session, BarError>> {}

/// Lazily build the bar index for an ordered sequence of sessions.
///
/// For each session the grid `open + k * frequency` (`k = 0, 1, …`, up to and
/// including the close) is generated; `closed` decides whether the open itself
/// is reported, and `force_close` appends the session close when the grid
/// misses it. Sessions never influence each other.
///
/// ```
/// use barindex_core::{bars, RangeConfig, Session};
/// use chrono::TimeZone;
///
/// let tz = chrono_tz::UTC;
/// let session = Session::new(
///     tz.with_ymd_and_hms(2016, 1, 4, 9, 0, 0).unwrap(),
///     tz.with_ymd_and_hms(2016, 1, 4, 10, 30, 0).unwrap(),
/// )
/// .unwrap();
///
/// let cfg = RangeConfig::parse("1H").unwrap();
/// let out: Vec<_> = bars([session], cfg).map(Result::unwrap).collect();
/// assert_eq!(out.len(), 2); // 10:00 on the grid, then the forced 10:30 close
/// ```
pub fn bars<I>(sessions: I, cfg: RangeConfig) -> Bars<InfallibleSessions<I::IntoIter>>
where
    I: IntoIterator<Item = Session>,
{
    let admit: fn(Session) -> Result<Session, BarError> = Ok;
    Bars::new(sessions.into_iter().map(admit), cfg)
}

/// Like [`bars`], for session sources that can fail mid-stream.
///
/// A source error is yielded as-is and ends the index.
pub fn try_bars<I>(sessions: I, cfg: RangeConfig) -> Bars<I::IntoIter>
where
    I: IntoIterator<Item = Result<Session, BarError>>,
{
    Bars::new(sessions.into_iter(), cfg)
}

/// Build the full bar index for an ordered sequence of sessions.
///
/// An empty session sequence yields an empty index.
///
/// # Errors
/// - `InvalidSession` if any session has `close <= open`.
/// - `UnorderedSessions` if a session opens before the previous one closed.
///
/// No partial index is returned on error.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "barindex::date_range",
        skip(sessions, cfg),
        fields(frequency = %cfg.frequency, closed = ?cfg.closed, force_close = cfg.force_close),
        err
    )
)]
pub fn date_range<I>(sessions: I, cfg: RangeConfig) -> Result<Vec<DateTime<Utc>>, BarError>
where
    I: IntoIterator<Item = Session>,
{
    bars(sessions, cfg).collect()
}

/// Parse `frequency` and build the full bar index.
///
/// The frequency is validated before any session is looked at.
///
/// # Errors
/// - `InvalidFrequency` if `frequency` does not parse.
/// - Any error of [`date_range`].
pub fn date_range_from_spec<I>(
    sessions: I,
    frequency: &str,
    closed: Closed,
    force_close: bool,
) -> Result<Vec<DateTime<Utc>>, BarError>
where
    I: IntoIterator<Item = Session>,
{
    let cfg = RangeConfig::parse(frequency)?
        .closed(closed)
        .force_close(force_close);
    date_range(sessions, cfg)
}
