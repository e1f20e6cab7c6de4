use std::collections::{BTreeMap, BTreeSet, HashSet};

use barindex_core::{BarError, Session, SessionProvider, SessionStream, Tz, check_date_range};
use chrono::{NaiveDate, NaiveTime, TimeZone, Weekday};

mod fixtures;

/// Mock session provider for CI-safe tests and examples.
///
/// Sessions follow fixed regular hours on every day that is neither a
/// weekend day nor a listed holiday; per-date overrides replace the open
/// and/or close. Nothing is computed beyond those explicit tables.
#[derive(Debug, Clone)]
pub struct MockCalendar {
    name: &'static str,
    tz: Tz,
    open: NaiveTime,
    close: NaiveTime,
    weekend: HashSet<Weekday>,
    holidays: BTreeSet<NaiveDate>,
    late_opens: BTreeMap<NaiveDate, NaiveTime>,
    early_closes: BTreeMap<NaiveDate, NaiveTime>,
    fail_on: Option<NaiveDate>,
}

impl MockCalendar {
    /// Start building a calendar.
    #[must_use]
    pub fn builder() -> MockCalendarBuilder {
        MockCalendarBuilder::new()
    }

    /// Fixture calendar with the given regular hours in `Asia/Ulaanbaatar`.
    ///
    /// Closed on weekends and 2016-01-01. Overrides: 2012-07-03 opens 11:15
    /// and closes 11:30, 2016-12-13 opens 11:20, 2016-12-14 closes 11:40.
    #[must_use]
    pub fn fake(open: NaiveTime, close: NaiveTime) -> Self {
        fixtures::calendars::fake(open, close)
    }

    /// [`fake`](Self::fake) with 09:00–12:00 regular hours.
    #[must_use]
    pub fn fake_morning() -> Self {
        Self::fake(fixtures::hm(9, 0), fixtures::hm(12, 0))
    }

    /// [`fake`](Self::fake) with 09:00–10:30 regular hours.
    #[must_use]
    pub fn fake_short_morning() -> Self {
        Self::fake(fixtures::hm(9, 0), fixtures::hm(10, 30))
    }

    fn is_trading_day(&self, date: NaiveDate) -> bool {
        !self.weekend.contains(&chrono::Datelike::weekday(&date)) && !self.holidays.contains(&date)
    }

    fn session_on(&self, date: NaiveDate) -> Result<Session, BarError> {
        if self.fail_on == Some(date) {
            return Err(BarError::provider(
                self.name,
                format!("forced failure on {date}"),
            ));
        }
        let open = self.late_opens.get(&date).copied().unwrap_or(self.open);
        let close = self.early_closes.get(&date).copied().unwrap_or(self.close);
        let resolve = |t: NaiveTime| {
            self.tz
                .from_local_datetime(&date.and_time(t))
                .earliest()
                .ok_or_else(|| {
                    BarError::provider(self.name, format!("{date} {t} does not exist locally"))
                })
        };
        Session::new(resolve(open)?, resolve(close)?)
    }
}

impl SessionProvider for MockCalendar {
    fn name(&self) -> &'static str {
        self.name
    }

    fn timezone(&self) -> Tz {
        self.tz
    }

    fn sessions(&self, start: NaiveDate, end: NaiveDate) -> Result<SessionStream<'_>, BarError> {
        check_date_range(start, end)?;
        Ok(Box::new(
            start
                .iter_days()
                .take_while(move |d| *d <= end)
                .filter(move |d| self.is_trading_day(*d))
                .map(move |d| self.session_on(d)),
        ))
    }
}

/// Builder for [`MockCalendar`].
#[derive(Debug, Clone)]
pub struct MockCalendarBuilder {
    inner: MockCalendar,
}

impl Default for MockCalendarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCalendarBuilder {
    /// UTC calendar named `barindex-mock`, 09:30–16:00, closed Saturday and Sunday.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: MockCalendar {
                name: "barindex-mock",
                tz: chrono_tz::UTC,
                open: fixtures::hm(9, 30),
                close: fixtures::hm(16, 0),
                weekend: [Weekday::Sat, Weekday::Sun].into_iter().collect(),
                holidays: BTreeSet::new(),
                late_opens: BTreeMap::new(),
                early_closes: BTreeMap::new(),
                fail_on: None,
            },
        }
    }

    /// Provider name reported by `SessionProvider::name`.
    #[must_use]
    pub const fn name(mut self, name: &'static str) -> Self {
        self.inner.name = name;
        self
    }

    /// Venue timezone the regular hours are expressed in.
    #[must_use]
    pub const fn timezone(mut self, tz: Tz) -> Self {
        self.inner.tz = tz;
        self
    }

    /// Regular open and close times.
    #[must_use]
    pub const fn hours(mut self, open: NaiveTime, close: NaiveTime) -> Self {
        self.inner.open = open;
        self.inner.close = close;
        self
    }

    /// Replace the set of weekend days.
    #[must_use]
    pub fn weekend(mut self, days: &[Weekday]) -> Self {
        self.inner.weekend = days.iter().copied().collect();
        self
    }

    /// Mark a date as a holiday.
    #[must_use]
    pub fn holiday(mut self, date: NaiveDate) -> Self {
        self.inner.holidays.insert(date);
        self
    }

    /// Open later than usual on `date`.
    #[must_use]
    pub fn late_open(mut self, date: NaiveDate, open: NaiveTime) -> Self {
        self.inner.late_opens.insert(date, open);
        self
    }

    /// Close earlier than usual on `date`.
    #[must_use]
    pub fn early_close(mut self, date: NaiveDate, close: NaiveTime) -> Self {
        self.inner.early_closes.insert(date, close);
        self
    }

    /// Yield a provider error instead of the session on `date`.
    #[must_use]
    pub const fn fail_on(mut self, date: NaiveDate) -> Self {
        self.inner.fail_on = Some(date);
        self
    }

    /// Finish the calendar.
    #[must_use]
    pub fn build(self) -> MockCalendar {
        self.inner
    }
}
