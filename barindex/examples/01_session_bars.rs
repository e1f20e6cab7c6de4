use std::sync::Arc;

use barindex::{BarIndex, Closed, RangeConfig};
use barindex_mock::MockCalendar;
use chrono::NaiveDate;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. A fixture venue in Asia/Ulaanbaatar: 09:00-12:00, closed weekends and
    //    2016-01-01, with a late open on 2016-12-13 and an early close on 2016-12-14.
    let calendar = Arc::new(MockCalendar::fake_morning());

    // 2. Hourly bars labelled at their right edge, plus every session close.
    let index = BarIndex::builder()
        .with_provider(calendar)
        .config(RangeConfig::parse("1H")?.closed(Closed::Right))
        .build()?;

    let start = NaiveDate::from_ymd_opt(2016, 12, 12).ok_or("bad start date")?;
    let end = NaiveDate::from_ymd_opt(2016, 12, 16).ok_or("bad end date")?;

    // 3. Inspect the sessions the provider reports.
    for s in index.sessions(start, end)? {
        println!("{}  {} -> {}", s.date(), s.open.format("%H:%M"), s.close.format("%H:%M"));
    }

    // 4. Print the sampling instants in venue time.
    let tz = index.timezone();
    for t in index.range(start, end)? {
        println!("{}", t.with_timezone(&tz).format("%Y-%m-%d %H:%M %Z"));
    }

    // 5. Same window, daily frequency, reporting opens and closes.
    let daily = RangeConfig::parse("1D")?.closed(Closed::Both);
    println!("daily: {} instants", index.range_with(start, end, daily)?.len());

    Ok(())
}
