use std::sync::Arc;

use barindex_core::{
    BarError, Bars, Closed, Frequency, RangeConfig, Session, SessionProvider, SessionStream,
    Tz, check_date_range, try_bars,
};
use chrono::{DateTime, NaiveDate, Utc};

/// Orchestrator that builds bar indexes over a session provider's calendar.
///
/// Cheap to clone and safe to share across threads; every call is independent.
#[derive(Clone)]
pub struct BarIndex {
    pub(crate) provider: Arc<dyn SessionProvider>,
    pub(crate) cfg: RangeConfig,
}

/// Builder for constructing a `BarIndex` with custom configuration.
pub struct BarIndexBuilder {
    provider: Option<Arc<dyn SessionProvider>>,
    cfg: RangeConfig,
}

impl Default for BarIndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BarIndexBuilder {
    /// Create a new builder with the default range configuration.
    ///
    /// Defaults: daily frequency, `Closed::Right`, forced closes. A provider
    /// must be registered via [`with_provider`](Self::with_provider).
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: None,
            cfg: RangeConfig::default(),
        }
    }

    /// Register the session provider. A later call replaces an earlier one.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn SessionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the sampling frequency.
    #[must_use]
    pub const fn frequency(mut self, frequency: Frequency) -> Self {
        self.cfg.frequency = frequency;
        self
    }

    /// Set the boundary mode.
    ///
    /// - `Right`: the session open anchors the grid but is not reported.
    /// - `Left` / `Both`: the open is reported. A grid point that lands on
    ///   the close is reported in every mode.
    #[must_use]
    pub const fn closed(mut self, closed: Closed) -> Self {
        self.cfg.closed = closed;
        self
    }

    /// Toggle close forcing.
    ///
    /// When enabled every session contributes its true close even if the
    /// grid misses it, so early closes always show up in the index.
    #[must_use]
    pub const fn force_close(mut self, yes: bool) -> Self {
        self.cfg.force_close = yes;
        self
    }

    /// Replace the whole range configuration at once.
    #[must_use]
    pub const fn config(mut self, cfg: RangeConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Build the `BarIndex`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no provider has been registered.
    pub fn build(self) -> Result<BarIndex, BarError> {
        let provider = self.provider.ok_or_else(|| {
            BarError::InvalidArg(
                "no session provider registered; add one via with_provider(...)".to_string(),
            )
        })?;
        Ok(BarIndex {
            provider,
            cfg: self.cfg,
        })
    }
}

/// Attribute a provider-originated error to the provider.
///
/// Session invariant violations and provider failures are kept as-is.
pub fn tag_err(provider: &str, e: BarError) -> BarError {
    match e {
        e @ (BarError::Provider { .. }
        | BarError::InvalidSession { .. }
        | BarError::UnorderedSessions { .. }) => e,
        other => BarError::provider(provider, other.to_string()),
    }
}

impl BarIndex {
    /// Start building a new `BarIndex`.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use barindex::{BarIndex, Closed, Frequency};
    /// use barindex_mock::MockCalendar;
    /// use chrono::NaiveDate;
    ///
    /// let index = BarIndex::builder()
    ///     .with_provider(Arc::new(MockCalendar::fake_short_morning()))
    ///     .frequency(Frequency::HOURLY)
    ///     .closed(Closed::Right)
    ///     .build()
    ///     .unwrap();
    ///
    /// let day = NaiveDate::from_ymd_opt(2016, 1, 4).unwrap();
    /// // 10:00 on the grid and the forced 10:30 close.
    /// assert_eq!(index.range(day, day).unwrap().len(), 2);
    /// ```
    #[must_use]
    pub fn builder() -> BarIndexBuilder {
        BarIndexBuilder::new()
    }

    /// Configuration used by [`range`](Self::range) and [`range_iter`](Self::range_iter).
    #[must_use]
    pub const fn config(&self) -> &RangeConfig {
        &self.cfg
    }

    /// Name of the registered session provider.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Reference timezone of the venue, for rendering UTC bars in local time.
    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.provider.timezone()
    }

    fn session_stream(&self, start: NaiveDate, end: NaiveDate) -> Result<SessionStream<'_>, BarError> {
        check_date_range(start, end)?;
        let name = self.provider.name();
        let stream = self
            .provider
            .sessions(start, end)
            .map_err(|e| tag_err(name, e))?;
        Ok(Box::new(stream.map(move |r| r.map_err(|e| tag_err(name, e)))))
    }

    /// Sessions whose trading date lies in `start..=end`.
    ///
    /// # Errors
    /// - `InvalidArg` if `start > end`.
    /// - Any provider failure, tagged with the provider name.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "barindex::core::sessions",
            skip(self),
            fields(provider = self.provider.name()),
            err
        )
    )]
    pub fn sessions(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Session>, BarError> {
        self.session_stream(start, end)?.collect()
    }

    /// Lazily build the bar index for `start..=end` with the configured settings.
    ///
    /// Sessions are pulled from the provider one at a time as the iterator
    /// advances; the first error ends the iteration.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `start > end`, or the provider's error if it
    /// fails before producing any session.
    pub fn range_iter(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Bars<SessionStream<'_>>, BarError> {
        Ok(try_bars(self.session_stream(start, end)?, self.cfg))
    }

    /// Build the bar index for `start..=end` with the configured settings.
    ///
    /// # Errors
    /// - `InvalidArg` if `start > end`.
    /// - `InvalidSession` / `UnorderedSessions` if the provider breaks the
    ///   session invariants.
    /// - Any provider failure, tagged with the provider name.
    pub fn range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DateTime<Utc>>, BarError> {
        self.range_with(start, end, self.cfg)
    }

    /// Build the bar index for `start..=end` with a one-off configuration.
    ///
    /// # Errors
    /// Same as [`range`](Self::range).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "barindex::core::range",
            skip(self, cfg),
            fields(
                provider = self.provider.name(),
                frequency = %cfg.frequency,
                closed = ?cfg.closed,
                force_close = cfg.force_close,
            ),
            err
        )
    )]
    pub fn range_with(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        cfg: RangeConfig,
    ) -> Result<Vec<DateTime<Utc>>, BarError> {
        let out: Vec<DateTime<Utc>> = try_bars(self.session_stream(start, end)?, cfg)
            .collect::<Result<_, _>>()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(bars = out.len(), "built bar index");
        Ok(out)
    }
}
