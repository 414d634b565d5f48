//! Create command for adding a tracker.

use std::io::Write;

use anyhow::Result;
use avg_core::TrackerName;
use avg_store::Store;
use clap::Args;

use crate::Config;

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Name of the new tracker.
    pub name: TrackerName,
    /// What the tracker measures.
    pub description: Option<String>,
    // Anything after the description is ignored.
    #[arg(trailing_var_arg = true, hide = true)]
    pub rest: Vec<String>,
}

/// Runs the create command.
pub fn run<W: Write>(
    writer: &mut W,
    args: &CreateArgs,
    store: &Store,
    config: &Config,
) -> Result<()> {
    let description = args
        .description
        .as_deref()
        .unwrap_or(&config.default_description);

    let tracker = store.create(args.name.clone(), Some(description))?;
    writeln!(writer, "Created tracker '{}'.", tracker.name)?;
    Ok(())
}
