use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use barindex_types::{BarError, MergeHow, Session};
use chrono::NaiveDate;

/// Combine several session schedules into one, keyed by trading date.
///
/// The trading date of a session is the local date of its open.
///
/// - `Outer`: every date present in any schedule; open is the earliest open
///   and close the latest close on that date.
/// - `Inner`: only dates present in every schedule; open is the latest open
///   and close the earliest close. Dates where the schedules share no trading
///   window are dropped.
///
/// Output sessions are sorted by date and expressed in the timezone of their
/// open. Several sessions of one schedule on the same date are first folded
/// into one spanning the earliest open and the latest close.
///
/// # Errors
/// Returns `InvalidSession` if any input session has `close <= open`.
pub fn merge_sessions<I, S>(schedules: I, how: MergeHow) -> Result<Vec<Session>, BarError>
where
    I: IntoIterator<Item = S>,
    S: IntoIterator<Item = Session>,
{
    let mut by_date: BTreeMap<NaiveDate, (Session, usize)> = BTreeMap::new();
    let mut schedule_count = 0usize;

    for schedule in schedules {
        schedule_count += 1;
        // A venue's own sessions on one date (e.g. around a lunch break) span that date.
        let mut days: BTreeMap<NaiveDate, Session> = BTreeMap::new();
        for session in schedule {
            session.validate()?;
            match days.entry(session.date()) {
                Entry::Vacant(v) => {
                    v.insert(session);
                }
                Entry::Occupied(mut o) => {
                    let acc = o.get_mut();
                    *acc = combine(*acc, session, MergeHow::Outer);
                }
            }
        }
        for (date, session) in days {
            match by_date.entry(date) {
                Entry::Vacant(v) => {
                    v.insert((session, 1));
                }
                Entry::Occupied(mut o) => {
                    let (acc, present_in) = o.get_mut();
                    *acc = combine(*acc, session, how);
                    *present_in += 1;
                }
            }
        }
    }

    let mut out = Vec::with_capacity(by_date.len());
    for (_date, (session, present_in)) in by_date {
        if how == MergeHow::Inner {
            if present_in < schedule_count {
                continue;
            }
            if session.close <= session.open {
                #[cfg(feature = "tracing")]
                tracing::debug!(date = %_date, "inner merge: no common trading window, dropping date");
                continue;
            }
        }
        out.push(session);
    }
    Ok(out)
}

fn combine(acc: Session, other: Session, how: MergeHow) -> Session {
    let (open, close) = match how {
        MergeHow::Outer => (acc.open.min(other.open), acc.close.max(other.close)),
        MergeHow::Inner => (acc.open.max(other.open), acc.close.min(other.close)),
    };
    Session {
        open,
        close: close.with_timezone(&open.timezone()),
    }
}
