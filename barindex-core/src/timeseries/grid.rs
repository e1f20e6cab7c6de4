use barindex_types::Frequency;
use chrono::offset::LocalResult;
use chrono::{DateTime, Days, Offset, TimeDelta, TimeZone};
use chrono_tz::Tz;

/// The `k`-th grid point `open + k * frequency`, in the open's timezone.
///
/// Clock frequencies add exact elapsed time. Day frequencies add calendar
/// days to the local wall-clock time of `open`, so the grid keeps the same
/// local time of day across UTC offset changes.
///
/// Returns `None` only when the point is not representable.
#[must_use]
pub fn nth_point(open: DateTime<Tz>, frequency: Frequency, k: u64) -> Option<DateTime<Tz>> {
    let steps = i64::from(frequency.multiplier()).checked_mul(i64::try_from(k).ok()?)?;
    if frequency.is_calendar() {
        add_calendar_days(open, u64::try_from(steps).ok()?)
    } else {
        let secs = steps.checked_mul(frequency.unit().seconds())?;
        open.checked_add_signed(TimeDelta::try_seconds(secs)?)
    }
}

fn add_calendar_days(open: DateTime<Tz>, days: u64) -> Option<DateTime<Tz>> {
    let tz = open.timezone();
    let naive = open.naive_local().checked_add_days(Days::new(days))?;
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, latest) => {
            // Keep the anchor's UTC offset when the wall-clock time repeats.
            let anchor = open.offset().fix().local_minus_utc();
            if latest.offset().fix().local_minus_utc() == anchor {
                Some(latest)
            } else {
                Some(earliest)
            }
        }
        LocalResult::None => {
            // Wall-clock time skipped by a DST gap: fall back to elapsed days.
            let days = i64::try_from(days).ok()?;
            open.checked_add_signed(TimeDelta::try_days(days)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn daily_steps_keep_local_wall_clock_across_dst() {
        let ny = chrono_tz::America::New_York;
        // Friday before the 2024 spring-forward weekend.
        let open = ny.with_ymd_and_hms(2024, 3, 8, 9, 30, 0).unwrap();
        let monday = nth_point(open, Frequency::days(3).unwrap(), 1).unwrap();
        assert_eq!((monday.hour(), monday.minute()), (9, 30));
        // 3 calendar days minus the skipped hour.
        assert_eq!(monday - open, TimeDelta::hours(71));
    }

    #[test]
    fn clock_steps_are_exact_elapsed_time() {
        let ny = chrono_tz::America::New_York;
        let open = ny.with_ymd_and_hms(2024, 3, 9, 20, 0, 0).unwrap();
        let p = nth_point(open, Frequency::hours(24).unwrap(), 1).unwrap();
        assert_eq!(p - open, TimeDelta::hours(24));
        assert_eq!(p.hour(), 21);
    }

    #[test]
    fn zeroth_point_is_the_anchor() {
        let tz = chrono_tz::UTC;
        let open = tz.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(nth_point(open, Frequency::MINUTELY, 0), Some(open));
        assert_eq!(nth_point(open, Frequency::DAILY, 0), Some(open));
    }

    #[test]
    fn skipped_wall_clock_time_falls_back_to_elapsed_days() {
        let ny = chrono_tz::America::New_York;
        // 02:30 does not exist on 2024-03-10.
        let open = ny.with_ymd_and_hms(2024, 3, 9, 2, 30, 0).unwrap();
        let p = nth_point(open, Frequency::DAILY, 1).unwrap();
        assert_eq!(p - open, TimeDelta::hours(24));
        assert_eq!(p.hour(), 3);
    }

    #[test]
    fn indices_beyond_u32_still_step() {
        let tz = chrono_tz::UTC;
        let open = tz.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let k = u64::from(u32::MAX) + 1;
        let p = nth_point(open, Frequency::seconds(1).unwrap(), k).unwrap();
        assert_eq!(p - open, TimeDelta::seconds(1 << 32));
        assert_eq!(nth_point(open, Frequency::seconds(1).unwrap(), u64::MAX), None);
        assert_eq!(nth_point(open, Frequency::DAILY, u64::MAX), None);
    }
}
