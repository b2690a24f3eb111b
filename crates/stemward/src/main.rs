mod commands;
mod context;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stemward")]
#[command(about = "Upload stemcells once, track the current one, clean up the rest", long_about = None)]
struct Cli {
    /// Config file (defaults to stemward.yml lookup)
    #[arg(short, long, global = true, env = "STEMWARD_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an extracted stemcell (skipped if already uploaded)
    Upload {
        /// Directory containing stemcell.MF and image
        path: PathBuf,
    },
    /// Show the current stemcell
    Current,
    /// List stemcells other than the current one
    Unused,
    /// Delete every stemcell other than the current one
    DeleteUnused,
    /// Mark an uploaded stemcell as current
    Use {
        name: String,
        #[arg(value_name = "VERSION")]
        stemcell_version: String,
    },
    /// Show version
    Version,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Version needs no config
    let load = || context::Context::load(cli.config.as_deref());

    match &cli.command {
        Commands::Version => {
            println!("stemward {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Upload { path } => commands::upload::handle(&load()?, path).await,
        Commands::Current => commands::current::handle(&load()?).await,
        Commands::Unused => commands::unused::handle(&load()?).await,
        Commands::DeleteUnused => commands::delete_unused::handle(&load()?).await,
        Commands::Use {
            name,
            stemcell_version,
        } => commands::use_stemcell::handle(&load()?, name, stemcell_version).await,
    }
}
