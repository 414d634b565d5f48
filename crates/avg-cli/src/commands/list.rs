//! List command for showing every tracker with its current average.

use std::io::Write;

use anyhow::{Result, bail};
use avg_core::Tracker;
use avg_store::{Store, StoreError};
use clap::Args;

use super::CREATE_HINT;

#[derive(Debug, Default, Args)]
pub struct ListArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
    // Extra arguments are accepted and ignored.
    #[arg(trailing_var_arg = true, hide = true)]
    pub rest: Vec<String>,
}

/// Format trackers as `<name> - <value>` lines.
pub fn format_trackers(trackers: &[Tracker]) -> String {
    trackers
        .iter()
        .map(|tracker| format!("{} - {}\n", tracker.name, tracker.value))
        .collect()
}

/// Runs the list command.
pub fn run<W: Write>(writer: &mut W, args: &ListArgs, store: &Store) -> Result<()> {
    let trackers = match store.list() {
        Ok(trackers) => trackers,
        Err(StoreError::NoTrackers) => bail!("You have no trackers.\n{CREATE_HINT}"),
        Err(e) => return Err(e.into()),
    };

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&trackers)?)?;
    } else {
        write!(writer, "{}", format_trackers(&trackers))?;
    }

    Ok(())
}
