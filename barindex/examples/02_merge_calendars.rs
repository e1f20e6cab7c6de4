use barindex::{MergeHow, RangeConfig, Session, date_range, merge_sessions};
use chrono::TimeZone;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let tz = chrono_tz::Europe::London;
    let at = |d: u32, h: u32, m: u32| {
        tz.with_ymd_and_hms(2024, 5, d, h, m, 0)
            .single()
            .ok_or("ambiguous local time")
    };

    // Two venues sharing a timezone; the second is closed on the 8th.
    let lse = vec![
        Session::new(at(7, 8, 0)?, at(7, 16, 30)?)?,
        Session::new(at(8, 8, 0)?, at(8, 16, 30)?)?,
    ];
    let ice = vec![
        Session::new(at(7, 7, 0)?, at(7, 15, 0)?)?,
        Session::new(at(9, 7, 0)?, at(9, 15, 0)?)?,
    ];

    for how in [MergeHow::Inner, MergeHow::Outer] {
        let merged = merge_sessions([lse.clone(), ice.clone()], how)?;
        let bars = date_range(merged.iter().copied(), RangeConfig::parse("4H")?)?;
        println!("{how:?}: {} sessions, {} bars", merged.len(), bars.len());
        for s in &merged {
            println!("  {}  {} -> {}", s.date(), s.open.format("%H:%M"), s.close.format("%H:%M"));
        }
    }

    Ok(())
}
