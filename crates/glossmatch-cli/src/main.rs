//! glossmatch CLI — match glossary terms to their explanations.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod session;

#[derive(Parser)]
#[command(
    name = "glossmatch",
    version,
    about = "Terminal glossary matching quiz"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play quiz rounds in the terminal
    Play {
        /// Alternate glossary file (requires --pin)
        #[arg(long)]
        glossary: Option<PathBuf>,

        /// Admin PIN unlocking privileged mode
        #[arg(long)]
        pin: Option<String>,

        /// Questions per round (default: from config, or 10)
        #[arg(long)]
        questions: Option<usize>,

        /// Seed for a repeatable shuffle
        #[arg(long)]
        seed: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write each finished round's summary as JSON here
        #[arg(long)]
        summary_out: Option<PathBuf>,
    },

    /// Validate a glossary file
    Validate {
        /// Path to a .json or .toml glossary
        #[arg(long)]
        glossary: PathBuf,
    },

    /// Print a glossary's content signature
    Signature {
        /// Path to a .json or .toml glossary
        #[arg(long)]
        glossary: PathBuf,

        /// Previously recorded signature to compare against
        #[arg(long)]
        previous: Option<String>,
    },

    /// Create a starter config and sample glossary
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("glossmatch=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            glossary,
            pin,
            questions,
            seed,
            config,
            summary_out,
        } => commands::play::execute(glossary, pin, questions, seed, config, summary_out),
        Commands::Validate { glossary } => commands::validate::execute(glossary),
        Commands::Signature { glossary, previous } => {
            commands::signature::execute(glossary, previous)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
