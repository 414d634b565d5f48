use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use avg_cli::commands::{create, delete, list, push, show};
use avg_cli::{Cli, Commands, Config};
use avg_store::Store;

/// Load config and open the tracker store, creating its directory if needed.
fn open_store(cli: &Cli) -> Result<(Store, Config)> {
    let config = Config::load_from(cli.config.as_deref())?;
    tracing::debug!(?config, "loaded configuration");

    let store = Store::open(&config.trackers_dir).with_context(|| {
        format!(
            "failed to open tracker directory {}",
            config.trackers_dir.display()
        )
    })?;
    Ok((store, config))
}

fn main() -> Result<()> {
    // Usage errors exit with 1 rather than clap's default of 2.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = i32::from(err.use_stderr());
            let _ = err.print();
            std::process::exit(code);
        }
    };

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let (store, config) = open_store(&cli)?;
    let mut stdout = io::stdout().lock();

    match &cli.command {
        None => list::run(&mut stdout, &list::ListArgs::default(), &store)?,
        Some(Commands::List(args)) => list::run(&mut stdout, args, &store)?,
        Some(Commands::Create(args)) => create::run(&mut stdout, args, &store, &config)?,
        Some(Commands::Delete(args)) => delete::run(&mut stdout, args, &store)?,
        Some(Commands::Push(args)) => push::run(&mut stdout, args, &store)?,
        Some(Commands::Show(args)) => show::run(&mut stdout, args, &store)?,
    }

    Ok(())
}
