//! code-anonymizer - anonymize code before sharing it, restore it afterwards.

use clap::{Parser, Subcommand, ValueEnum};
use code_anonymizer::{
    commands::{anonymize_selection, revert_selection},
    config::Config,
    privacy::{Anonymizer, Deanonymizer},
    store::{FileMappingStore, MappingStore},
    terminal::TerminalHost,
    CommandOutcome,
};
use std::path::PathBuf;
use tracing::{debug, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Reversible identifier anonymization for code snippets
#[derive(Parser)]
#[command(name = "code-anonymizer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress informational messages
    #[arg(short, long)]
    quiet: bool,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Mapping state file
    #[arg(long, env = "CODE_ANONYMIZER_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy)]
enum MappingFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Strip comments, anonymize identifiers and save the mapping
    Anonymize {
        /// File to anonymize (stdin if not specified)
        input: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Restore original identifiers using the saved mapping
    Revert {
        /// File to revert (stdin if not specified)
        input: Option<PathBuf>,

        /// Write the result back into INPUT
        #[arg(long, requires = "input")]
        in_place: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, conflicts_with = "in_place")]
        output: Option<PathBuf>,
    },

    /// Show the saved mapping
    Mapping {
        #[arg(short = 'f', long, default_value = "text")]
        format: MappingFormat,
    },

    /// Forget the saved mapping
    Clear,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 if cli.quiet => Level::ERROR,
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_level.to_string())),
        )
        .init();

    // Load configuration
    let config = if let Some(ref config_path) = cli.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    let mut store = match cli.store.clone().or_else(|| config.store.path.clone()) {
        Some(path) => FileMappingStore::new(path),
        None => FileMappingStore::default_store()?,
    };
    debug!("Using mapping store at {}", store.path().display());

    let outcome = match cli.command {
        Commands::Anonymize { input, output } => {
            let anonymizer = Anonymizer::with_config(&config.anonymizer)?;
            let mut host = TerminalHost::new(input)
                .with_output(output)
                .quiet(cli.quiet);
            anonymize_selection(&mut host, &mut store, &anonymizer)
        }

        Commands::Revert {
            input,
            in_place,
            output,
        } => {
            let mut host = TerminalHost::new(input)
                .in_place(in_place)
                .with_output(output)
                .quiet(cli.quiet);
            revert_selection(&mut host, &store, &Deanonymizer::new())
        }

        Commands::Mapping { format } => {
            let Some(stored) = store.load()? else {
                warn!("No mapping saved in {}", store.path().display());
                eprintln!("warning: No mapping available! Run \"Anonymize Code\" first.");
                std::process::exit(1);
            };

            match format {
                MappingFormat::Json => println!("{}", serde_json::to_string_pretty(&stored)?),
                MappingFormat::Text => {
                    println!(
                        "Mapping of {} identifiers saved at {}",
                        stored.mapping.len(),
                        stored.saved_at.to_rfc3339()
                    );
                    if let Some(ref fingerprint) = stored.fingerprint {
                        println!("Anonymized output fingerprint: {}", fingerprint);
                    }
                    for (placeholder, original) in stored.mapping.entries() {
                        println!("  {} -> {}", placeholder, original);
                    }
                }
            }
            CommandOutcome::Completed
        }

        Commands::Clear => {
            store.clear()?;
            if !cli.quiet {
                eprintln!("info: Mapping cleared.");
            }
            CommandOutcome::Completed
        }
    };

    if let CommandOutcome::Aborted(err) = outcome {
        debug!("Command aborted: {}", err);
        std::process::exit(1);
    }

    Ok(())
}
