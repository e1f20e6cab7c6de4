use std::sync::Arc;

use barindex::{BarIndex, Closed, Frequency};
use barindex_mock::MockCalendar;
use chrono::NaiveDate;
use tracing_subscriber::fmt::format::FmtSpan;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Spans are emitted when built with `--features tracing`.
    // Suggested: RUST_LOG=debug,barindex_core=trace
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let index = BarIndex::builder()
        .with_provider(Arc::new(MockCalendar::fake_morning()))
        .frequency(Frequency::minutes(30)?)
        .closed(Closed::Both)
        .build()?;

    let start = NaiveDate::from_ymd_opt(2012, 7, 2).ok_or("bad start date")?;
    let end = NaiveDate::from_ymd_opt(2012, 7, 4).ok_or("bad end date")?;
    let _ = index.sessions(start, end)?;
    let _ = index.range(start, end)?;

    // Provider failures surface as errors and are logged by the span.
    let flaky = BarIndex::builder()
        .with_provider(Arc::new(
            MockCalendar::builder().name("flaky").fail_on(end).build(),
        ))
        .build()?;
    if let Err(e) = flaky.range(start, end) {
        println!("expected failure: {e}");
    }

    Ok(())
}
