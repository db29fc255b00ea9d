mod cycle;
mod errors;
mod fixture;

use std::env;
use std::path::Path;

use env_logger::Env;
use log::{info, warn};
use viewstate_ui_log::{LogSettings, MemoryLog, SharedStream, StreamRedirector};

use crate::fixture::Fixture;

const MAX_REPORT_LINES: usize = 1000;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let fixture = match env::args_os().nth(1) {
        Some(path) => Fixture::load(Path::new(&path))?,
        None => Fixture::builtin()?,
    };

    let report = SharedStream::stdout();
    let max_lines = fixture.report_line_bound().max(MAX_REPORT_LINES);
    let settings = LogSettings::default().with_max_lines(max_lines);
    let log = MemoryLog::new(&settings);

    let redirect = StreamRedirector::attach(&report, log.clone())?;
    let summary = cycle::run(&fixture, &mut report.clone())?;
    redirect.detach()?;

    info!(
        "restored {} expanded and {} selected nodes",
        summary.expanded, summary.selected
    );
    let evicted = log.evicted()?;
    if evicted > 0 {
        warn!("report: {evicted} oldest lines were dropped");
    }
    for line in log.lines()? {
        println!("{line}");
    }

    Ok(())
}
