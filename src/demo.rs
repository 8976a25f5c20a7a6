//! `tictoc demo` — run the instrumented pipeline once and print the report.

use anyhow::Result;
use tictoc_core::{ScopedPrintTimer, TimerGroup};

use crate::config::BenchConfig;
use crate::pipeline::Pipeline;

pub fn run(config: &BenchConfig) -> Result<()> {
    let _total = ScopedPrintTimer::new("demo total");

    let mut pipeline = Pipeline::new(config.sample_points);
    let mut group = TimerGroup::new(config.enabled);
    group.attach("Pipeline", &mut pipeline);
    group.attach("Resampler", &mut pipeline.resampler);

    // Uneven call counts so the report shows distinct count columns.
    pipeline.ingest();
    pipeline.ingest();
    pipeline.ingest();
    pipeline.transform();
    pipeline.finalize();

    println!("{}", group.render()?);

    // Disabled calls must leave the report untouched.
    group.disable();
    pipeline.transform();
    group.enable();

    eprintln!();
    eprintln!("after a disabled transform() call (counts unchanged):");
    eprintln!("{}", group.render()?);

    group.reset();
    eprintln!();
    eprintln!("after reset():");
    eprintln!("{}", group.render()?);

    Ok(())
}
