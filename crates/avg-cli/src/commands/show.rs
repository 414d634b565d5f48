//! Show command for inspecting one tracker.

use std::io::Write;

use anyhow::Result;
use avg_core::{Tracker, TrackerName};
use avg_store::Store;
use clap::Args;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Tracker to show.
    pub name: TrackerName,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Format a tracker for human-readable output.
pub fn format_tracker(tracker: &Tracker) -> String {
    format!(
        "{}\nDescription: {}\nAverage:     {}\nSamples:     {}\n",
        tracker.name, tracker.description, tracker.value, tracker.count
    )
}

pub fn run<W: Write>(writer: &mut W, args: &ShowArgs, store: &Store) -> Result<()> {
    let tracker = store.get(&args.name)?;

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&tracker)?)?;
    } else {
        write!(writer, "{}", format_tracker(&tracker))?;
    }
    Ok(())
}
