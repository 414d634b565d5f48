//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::create::CreateArgs;
use crate::commands::delete::DeleteArgs;
use crate::commands::list::ListArgs;
use crate::commands::push::PushArgs;
use crate::commands::show::ShowArgs;

/// Personal running-average tracker.
///
/// Create named trackers, push numbers onto them and see their running
/// average.
#[derive(Debug, Parser)]
#[command(name = "avg", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    // Defaults to `list` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List trackers and their current averages.
    List(ListArgs),

    /// Create a new tracker.
    Create(CreateArgs),

    /// Delete a tracker.
    Delete(DeleteArgs),

    /// Push one or more values onto a tracker.
    Push(PushArgs),

    /// Show a single tracker in detail.
    Show(ShowArgs),
}
