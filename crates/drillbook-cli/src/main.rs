//! drillbook CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;
mod terminal;
mod viewer;

#[derive(Parser)]
#[command(
    name = "drillbook",
    version,
    about = "Adaptive multiple-choice quiz trainer"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the catalog, write enabled exports, then run the quiz
    Run {
        /// Catalog text file
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Progress save file
        #[arg(long)]
        save_file: Option<PathBuf>,

        /// Skip the interactive quiz
        #[arg(long)]
        no_quiz: bool,

        /// Skip all exports
        #[arg(long)]
        no_export: bool,

        /// Seed for question selection and answer shuffling
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Write catalog exports without running the quiz
    Export {
        /// Catalog text file
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Export format: markup, table, text, all (comma-separated)
        #[arg(long, default_value = "all")]
        format: String,

        /// Output directory (default: paths from the config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Seed for practice sheet shuffling
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Parse the catalog and report per-topic counts
    Validate {
        /// Catalog text file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Show the level distribution of the saved progress
    Stats {
        /// Catalog text file
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Progress save file
        #[arg(long)]
        save_file: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Create a starter drillbook.toml
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("drillbook=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Run {
            catalog,
            save_file,
            no_quiz,
            no_export,
            seed,
        } => commands::load_settings(config_path, catalog, save_file)
            .and_then(|config| commands::run::execute(config, no_quiz, no_export, seed)),
        Commands::Export {
            catalog,
            format,
            output,
            seed,
        } => commands::load_settings(config_path, catalog, None)
            .and_then(|config| commands::export::execute(&config, &format, output, seed)),
        Commands::Validate { catalog } => commands::load_settings(config_path, catalog, None)
            .and_then(|config| commands::validate::execute(&config)),
        Commands::Stats {
            catalog,
            save_file,
            json,
        } => commands::load_settings(config_path, catalog, save_file)
            .and_then(|config| commands::stats::execute(&config, json)),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
