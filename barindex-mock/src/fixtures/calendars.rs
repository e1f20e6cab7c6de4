use chrono::NaiveTime;

use super::{hm, ymd};
use crate::MockCalendar;

pub fn fake(open: NaiveTime, close: NaiveTime) -> MockCalendar {
    MockCalendar::builder()
        .name("mock-fake")
        .timezone(chrono_tz::Asia::Ulaanbaatar)
        .hours(open, close)
        .holiday(ymd(2016, 1, 1))
        .late_open(ymd(2012, 7, 3), hm(11, 15))
        .early_close(ymd(2012, 7, 3), hm(11, 30))
        .late_open(ymd(2016, 12, 13), hm(11, 20))
        .early_close(ymd(2016, 12, 14), hm(11, 40))
        .build()
}
