use barindex_core::{BarError, MergeHow, Session, merge_sessions};
use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

fn at(tz: Tz, s: &str) -> DateTime<Tz> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
    tz.from_local_datetime(&naive).single().unwrap()
}

fn session(tz: Tz, date: &str, open: &str, close: &str) -> Session {
    Session::new(at(tz, &format!("{date} {open}")), at(tz, &format!("{date} {close}"))).unwrap()
}

const UTC: Tz = chrono_tz::UTC;

fn venue_a() -> Vec<Session> {
    vec![
        session(UTC, "2021-03-01", "08:00", "16:30"),
        session(UTC, "2021-03-02", "08:00", "16:30"),
        session(UTC, "2021-03-03", "08:00", "12:00"),
    ]
}

fn venue_b() -> Vec<Session> {
    vec![
        session(UTC, "2021-03-01", "09:30", "17:00"),
        session(UTC, "2021-03-03", "13:00", "17:00"),
        session(UTC, "2021-03-04", "09:30", "17:00"),
    ]
}

#[test]
fn outer_merge_spans_union_of_dates_and_hours() {
    let out = merge_sessions([venue_a(), venue_b()], MergeHow::Outer).unwrap();
    assert_eq!(
        out,
        vec![
            session(UTC, "2021-03-01", "08:00", "17:00"),
            session(UTC, "2021-03-02", "08:00", "16:30"),
            session(UTC, "2021-03-03", "08:00", "17:00"),
            session(UTC, "2021-03-04", "09:30", "17:00"),
        ]
    );
}

#[test]
fn inner_merge_keeps_shared_dates_and_drops_disjoint_windows() {
    let out = merge_sessions([venue_a(), venue_b()], MergeHow::Inner).unwrap();
    // 03-02 and 03-04 are missing from one venue; on 03-03 the hours never overlap.
    assert_eq!(out, vec![session(UTC, "2021-03-01", "09:30", "16:30")]);
}

#[test]
fn inner_merge_of_single_schedule_is_identity() {
    let out = merge_sessions([venue_a()], MergeHow::Inner).unwrap();
    assert_eq!(out, venue_a());
}

#[test]
fn inner_merge_with_an_empty_schedule_is_empty() {
    let out = merge_sessions([venue_a(), Vec::new()], MergeHow::Inner).unwrap();
    assert!(out.is_empty());
    let none: Vec<Vec<Session>> = Vec::new();
    assert!(merge_sessions(none, MergeHow::Outer).unwrap().is_empty());
}

#[test]
fn merged_close_is_expressed_in_open_timezone() {
    let tokyo: Tz = chrono_tz::Asia::Tokyo;
    // 09:00–15:00 JST is 00:00–06:00 UTC.
    let a = vec![session(tokyo, "2021-03-01", "09:00", "15:00")];
    let b = vec![session(UTC, "2021-03-01", "01:00", "05:00")];

    let out = merge_sessions([a, b], MergeHow::Inner).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].open, at(UTC, "2021-03-01 01:00"));
    assert_eq!(out[0].close, at(UTC, "2021-03-01 05:00"));
    assert_eq!(out[0].close.timezone(), UTC);

    let out = merge_sessions(
        [
            vec![session(tokyo, "2021-03-01", "09:00", "15:00")],
            vec![session(UTC, "2021-03-01", "01:00", "07:00")],
        ],
        MergeHow::Outer,
    )
    .unwrap();
    assert_eq!(out[0].open.timezone(), tokyo);
    assert_eq!(out[0].close.timezone(), tokyo);
    assert_eq!(out[0].close, at(tokyo, "2021-03-01 16:00"));
}

#[test]
fn invalid_input_session_is_rejected() {
    let mut bad = venue_b();
    bad[0] = Session {
        open: bad[0].close,
        close: bad[0].open,
    };
    let err = merge_sessions([venue_a(), bad], MergeHow::Outer).unwrap_err();
    assert!(matches!(err, BarError::InvalidSession { .. }));
}

#[test]
fn split_sessions_of_one_venue_span_their_date() {
    let tokyo: Tz = chrono_tz::Asia::Tokyo;
    // Morning and afternoon sessions around the lunch break.
    let tse = vec![
        session(tokyo, "2021-03-01", "09:00", "11:30"),
        session(tokyo, "2021-03-01", "12:30", "15:00"),
        session(tokyo, "2021-03-02", "09:00", "11:30"),
        session(tokyo, "2021-03-02", "12:30", "15:00"),
    ];
    let spans = vec![
        session(tokyo, "2021-03-01", "09:00", "15:00"),
        session(tokyo, "2021-03-02", "09:00", "15:00"),
    ];

    assert_eq!(merge_sessions([tse.clone()], MergeHow::Inner).unwrap(), spans);
    assert_eq!(merge_sessions([tse.clone()], MergeHow::Outer).unwrap(), spans);

    // Against a venue trading only 10:00–13:00, the intersection is that window.
    let other = vec![session(tokyo, "2021-03-01", "10:00", "13:00")];
    assert_eq!(
        merge_sessions([tse, other], MergeHow::Inner).unwrap(),
        vec![session(tokyo, "2021-03-01", "10:00", "13:00")]
    );
}
