use std::sync::Arc;

use barindex::{
    BarError, BarIndex, Closed, Frequency, RangeConfig, Session, SessionProvider, SessionStream,
    StaticSchedule, Tz,
};
use barindex_mock::MockCalendar;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const ULAANBAATAR: Tz = chrono_tz::Asia::Ulaanbaatar;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn utc(s: &str) -> DateTime<Utc> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
    ULAANBAATAR
        .from_local_datetime(&naive)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

fn expected(points: &[&str]) -> Vec<DateTime<Utc>> {
    points.iter().map(|p| utc(p)).collect()
}

fn index(cal: MockCalendar, cfg: RangeConfig) -> BarIndex {
    BarIndex::builder()
        .with_provider(Arc::new(cal))
        .config(cfg)
        .build()
        .unwrap()
}

/// Provider whose upstream rejects every request with a non-provider error.
struct Broken;

impl SessionProvider for Broken {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn timezone(&self) -> Tz {
        chrono_tz::UTC
    }

    fn sessions(&self, _start: NaiveDate, _end: NaiveDate) -> Result<SessionStream<'_>, BarError> {
        Err(BarError::InvalidArg("upstream rejected the query".into()))
    }
}

#[test]
fn build_without_provider_is_invalid_arg() {
    let err = BarIndex::builder().build().err().unwrap();
    assert!(matches!(err, BarError::InvalidArg(ref m) if m.contains("with_provider")));
}

#[test]
fn builder_settings_land_in_config() {
    let bi = BarIndex::builder()
        .with_provider(Arc::new(MockCalendar::fake_morning()))
        .frequency(Frequency::minutes(30).unwrap())
        .closed(Closed::Both)
        .force_close(false)
        .build()
        .unwrap();
    assert_eq!(bi.provider_name(), "mock-fake");
    assert_eq!(bi.timezone(), ULAANBAATAR);
    assert_eq!(bi.config().frequency.to_string(), "30min");
    assert_eq!(bi.config().closed, Closed::Both);
    assert!(!bi.config().force_close);

    let default = BarIndex::builder()
        .with_provider(Arc::new(MockCalendar::fake_morning()))
        .build()
        .unwrap();
    assert_eq!(*default.config(), RangeConfig::default());
}

#[test]
fn daily_defaults_skip_holiday_and_weekend() {
    let bi = index(MockCalendar::fake_morning(), RangeConfig::default());
    let out = bi.range(d(2015, 12, 31), d(2016, 1, 6)).unwrap();
    assert_eq!(
        out,
        expected(&[
            "2015-12-31 12:00",
            "2016-01-04 12:00",
            "2016-01-05 12:00",
            "2016-01-06 12:00",
        ])
    );
}

#[test]
fn late_open_and_early_close_flow_through() {
    let cfg = RangeConfig::parse("1D").unwrap().closed(Closed::Both);
    let bi = index(MockCalendar::fake_morning(), cfg);
    let out = bi.range(d(2016, 12, 13), d(2016, 12, 15)).unwrap();
    assert_eq!(
        out,
        expected(&[
            "2016-12-13 11:20",
            "2016-12-13 12:00",
            "2016-12-14 09:00",
            "2016-12-14 11:40",
            "2016-12-15 09:00",
            "2016-12-15 12:00",
        ])
    );
}

#[test]
fn range_with_overrides_the_stored_config() {
    let bi = index(MockCalendar::fake_short_morning(), RangeConfig::default());
    let day = d(2016, 1, 4);
    assert_eq!(bi.range(day, day).unwrap(), expected(&["2016-01-04 10:30"]));

    let hourly = RangeConfig::new(Frequency::HOURLY);
    assert_eq!(
        bi.range_with(day, day, hourly).unwrap(),
        expected(&["2016-01-04 10:00", "2016-01-04 10:30"])
    );
    assert_eq!(
        bi.range_with(day, day, hourly.force_close(false)).unwrap(),
        expected(&["2016-01-04 10:00"])
    );
    // Stored config is untouched.
    assert_eq!(*bi.config(), RangeConfig::default());
}

#[test]
fn empty_window_yields_no_bars() {
    let bi = index(MockCalendar::fake_morning(), RangeConfig::default());
    // 2016-01-01 holiday through the weekend.
    assert!(bi.range(d(2016, 1, 1), d(2016, 1, 3)).unwrap().is_empty());
    assert!(bi.sessions(d(2016, 1, 1), d(2016, 1, 3)).unwrap().is_empty());
}

#[test]
fn inverted_range_is_rejected_before_the_provider() {
    let bi = BarIndex::builder()
        .with_provider(Arc::new(Broken))
        .build()
        .unwrap();
    let err = bi.range(d(2024, 1, 10), d(2024, 1, 1)).unwrap_err();
    assert!(matches!(err, BarError::InvalidArg(ref m) if m.contains("after end date")));
    assert!(err.is_input_error());
}

#[test]
fn foreign_provider_errors_are_tagged() {
    let bi = BarIndex::builder()
        .with_provider(Arc::new(Broken))
        .build()
        .unwrap();
    let err = bi.range(d(2024, 1, 1), d(2024, 1, 10)).unwrap_err();
    assert_eq!(
        err,
        BarError::provider("broken", "invalid argument: upstream rejected the query")
    );
    assert!(!err.is_input_error());
    assert!(bi.range_iter(d(2024, 1, 1), d(2024, 1, 10)).is_err());
}

#[test]
fn provider_failure_mid_stream_aborts_the_call() {
    let cal = MockCalendar::builder()
        .name("flaky")
        .fail_on(d(2024, 1, 10))
        .build();
    let bi = index(cal, RangeConfig::default());

    let err = bi.range(d(2024, 1, 8), d(2024, 1, 12)).unwrap_err();
    assert_eq!(
        err,
        BarError::provider("flaky", "forced failure on 2024-01-10")
    );

    // The lazy form yields the bars before the failure, then the error, then stops.
    let mut it = bi.range_iter(d(2024, 1, 8), d(2024, 1, 12)).unwrap();
    assert!(it.next().unwrap().is_ok());
    assert!(it.next().unwrap().is_ok());
    assert!(it.next().unwrap().is_err());
    assert!(it.next().is_none());
}

#[test]
fn invalid_provider_session_is_reported_unchanged() {
    // 2016-12-13 opens 11:20, after the 10:30 regular close.
    let bi = index(MockCalendar::fake_short_morning(), RangeConfig::default());
    let err = bi.range(d(2016, 12, 12), d(2016, 12, 14)).unwrap_err();
    assert!(matches!(err, BarError::InvalidSession { .. }));
    assert!(matches!(
        bi.sessions(d(2016, 12, 13), d(2016, 12, 13)),
        Err(BarError::InvalidSession { .. })
    ));
}

#[test]
fn static_schedule_backs_an_index() {
    let tz = chrono_tz::Europe::London;
    let s = Session::new(
        tz.with_ymd_and_hms(2024, 5, 7, 8, 0, 0).unwrap(),
        tz.with_ymd_and_hms(2024, 5, 7, 16, 30, 0).unwrap(),
    )
    .unwrap();
    let schedule = StaticSchedule::new("lse-static", tz, [s]).unwrap();
    let bi = BarIndex::builder()
        .with_provider(Arc::new(schedule))
        .frequency(Frequency::hours(4).unwrap())
        .build()
        .unwrap();

    let out = bi.range(d(2024, 5, 6), d(2024, 5, 8)).unwrap();
    assert_eq!(bi.timezone(), tz);
    let hm: Vec<String> = out
        .iter()
        .map(|t| t.with_timezone(&bi.timezone()).format("%H:%M").to_string())
        .collect();
    assert_eq!(hm, vec!["12:00", "16:00", "16:30"]);
}

#[test]
fn shared_index_serves_concurrent_callers() {
    let bi = index(MockCalendar::fake_morning(), RangeConfig::new(Frequency::HOURLY));
    let reference = bi.range(d(2016, 1, 4), d(2016, 1, 8)).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let bi = bi.clone();
                scope.spawn(move || bi.range(d(2016, 1, 4), d(2016, 1, 8)).unwrap())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), reference);
        }
    });
    // Five sessions, 10:00 / 11:00 / 12:00 each.
    assert_eq!(reference.len(), 15);
}
