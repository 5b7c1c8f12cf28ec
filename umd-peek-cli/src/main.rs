//! umd-peek CLI
//!
//! Command-line interface for extracting and caching PSP game preview assets.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

mod commands;
mod error;

use commands::cache::{run_cache_clear, run_cache_list, run_cache_path};
use commands::config::{run_config_clear_cache_root, run_config_set_cache_root, run_config_show};
use commands::extract::run_extract;
use commands::info::run_info;
use commands::scan::run_scan;
use error::CliError;

#[derive(Parser)]
#[command(name = "umd-peek")]
#[command(about = "Extract and cache PSP game preview assets", long_about = None)]
struct Cli {
    /// Cache directory for extracted assets (overrides settings)
    #[arg(long, global = true)]
    cache_root: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a game's assets into the cache and print their paths
    Extract {
        /// ISO or PBP file
        file: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect a game image without touching the cache
    Info {
        /// ISO or PBP file
        file: PathBuf,
    },

    /// Extract assets for every game in a folder
    Scan {
        /// Folder containing .iso, .cso or .pbp files
        folder: PathBuf,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the asset cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Print the cache directory
    Path,

    /// List cached games
    List,

    /// Remove all cached assets
    Clear,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the settings file and effective values
    Show,

    /// Save a cache directory to the settings file
    SetCacheRoot {
        /// Directory to store extracted assets in
        dir: PathBuf,
    },

    /// Remove the saved cache directory
    ClearCacheRoot,
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        log::error!(
            "{} {e}",
            "\u{2718}".if_supports_color(Stderr, |t| t.red()),
        );
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let cache_root = cli.cache_root;
    match cli.command {
        Commands::Extract { file, json } => run_extract(cache_root, &file, json),
        Commands::Info { file } => run_info(&file),
        Commands::Scan { folder, json } => run_scan(cache_root, &folder, json),
        Commands::Cache { action } => match action {
            CacheAction::Path => {
                run_cache_path(cache_root);
                Ok(())
            }
            CacheAction::List => run_cache_list(cache_root),
            CacheAction::Clear => run_cache_clear(cache_root),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                run_config_show(cache_root);
                Ok(())
            }
            ConfigAction::SetCacheRoot { dir } => run_config_set_cache_root(&dir),
            ConfigAction::ClearCacheRoot => run_config_clear_cache_root(),
        },
    }
}

/// Log records are the CLI's user-facing output, so they are printed bare.
/// `RUST_LOG` still overrides the level.
fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}
