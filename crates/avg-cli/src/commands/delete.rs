//! Delete command for removing a tracker.

use std::io::Write;

use anyhow::Result;
use avg_core::TrackerName;
use avg_store::Store;
use clap::Args;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Tracker to delete.
    pub name: TrackerName,
    // Anything after the name is ignored.
    #[arg(trailing_var_arg = true, hide = true)]
    pub rest: Vec<String>,
}

pub fn run<W: Write>(writer: &mut W, args: &DeleteArgs, store: &Store) -> Result<()> {
    store.delete(&args.name)?;
    writeln!(writer, "Deleted tracker '{}'.", args.name)?;
    Ok(())
}
