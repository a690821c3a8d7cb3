//! qute-script-manager: keep qutebrowser userscripts in sync with their upstream URLs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use qute_script_manager::commands;
use qute_script_manager::config::Paths;
use qute_script_manager::logging;

#[derive(Parser)]
#[command(name = "qute-script-manager")]
#[command(about = "Track, diff and install qutebrowser userscripts", long_about = None)]
#[command(version)]
struct Cli {
    /// Tracked-scripts file (default: <config dir>/qute_script_manager/urls.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Userscript directory to install into (default: <data dir>/qutebrowser/greasemonkey)
    #[arg(long, global = true, value_name = "DIR")]
    scripts_dir: Option<PathBuf>,

    /// Download cache directory (default: <cache dir>/qute_script_manager)
    #[arg(long, global = true, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start tracking a script URL
    Add {
        /// URL of the userscript
        url: String,

        /// Display name (defaults to the file name)
        #[arg(long)]
        nickname: Option<String>,
    },

    /// Print tracked scripts
    List {
        /// Include URLs
        #[arg(short, long)]
        urls: bool,
    },

    /// Fetch tracked scripts and install new versions
    Update {
        /// Skip asking for confirmation
        #[arg(long)]
        noconfirm: bool,

        /// Don't copy files to the userscript directory, just check for updates
        #[arg(long)]
        skipcopy: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.verbose);

    let paths = Paths::resolve(cli.config, cli.cache_dir, cli.scripts_dir)
        .context("Failed to determine directories")?;

    match cli.command {
        Commands::Add { url, nickname } => {
            commands::add::execute(&paths, &url, nickname.as_deref())?;
        }

        Commands::List { urls } => {
            let output = commands::list::execute(&paths, commands::list::ListOptions { urls })?;
            println!("{}", output);
        }

        Commands::Update {
            noconfirm,
            skipcopy,
        } => {
            let options = commands::update::UpdateOptions {
                noconfirm,
                skipcopy,
            };
            commands::update::execute(&paths, options)?;
        }
    }

    Ok(())
}
