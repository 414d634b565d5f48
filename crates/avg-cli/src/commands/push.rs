//! Push command for folding values into a tracker's running average.

use std::io::Write;

use anyhow::Result;
use avg_core::{TrackerName, parse_value};
use avg_store::Store;
use clap::Args;

#[derive(Debug, Args)]
pub struct PushArgs {
    /// Tracker to push onto.
    pub name: TrackerName,
    /// One or more numbers to add.
    #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
    pub values: Vec<String>,
}

/// Runs the push command.
///
/// Every value is parsed before the tracker is touched, so one bad value
/// rejects the whole push.
pub fn run<W: Write>(writer: &mut W, args: &PushArgs, store: &Store) -> Result<()> {
    let samples = args
        .values
        .iter()
        .map(|raw| parse_value(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let tracker = store.push(&args.name, &samples)?;
    tracing::debug!(tracker = %tracker.name, count = tracker.count, "push complete");

    writeln!(writer, "{} - {}", tracker.name, tracker.value)?;
    Ok(())
}
