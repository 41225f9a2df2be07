//! animind CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod reporter;

#[derive(Parser)]
#[command(name = "animind", version, about = "Grade 1-5 math practice and probability lab")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the progress record
    Status {
        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set the current grade (1-5)
    Grade {
        grade: u8,
    },

    /// List topics for a grade
    Topics {
        /// Grade to list (default: current grade)
        #[arg(long)]
        grade: Option<u8>,
    },

    /// Play through a topic's questions
    Quiz {
        /// Topic id, e.g. "addition"
        #[arg(long)]
        topic: String,

        /// Grade of the topic (default: current grade)
        #[arg(long)]
        grade: Option<u8>,

        /// Answers as comma-separated option indices starting at 0; read
        /// from stdin one per line when omitted
        #[arg(long)]
        answers: Option<String>,
    },

    /// Run probability experiments
    Lab {
        /// Experiment id (coin-flip, dice-roll, spinner-wheel, card-draw, weather-prediction)
        #[arg(long)]
        experiment: String,

        /// Number of trials to run
        #[arg(long, default_value = "1")]
        trials: u32,

        /// RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Directory to write a JSON lab report into
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show achievements and their progress
    Achievements,

    /// Validate question content TOML files
    Validate {
        /// Path to content file or directory
        #[arg(long)]
        content: PathBuf,
    },

    /// Create a starter animind.toml
    Init,
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("animind=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Status { json } => commands::status::execute(config, json),
        Commands::Grade { grade } => commands::grade::execute(config, grade),
        Commands::Topics { grade } => commands::topics::execute(config, grade),
        Commands::Quiz {
            topic,
            grade,
            answers,
        } => commands::quiz::execute(config, topic, grade, answers),
        Commands::Lab {
            experiment,
            trials,
            seed,
            output,
        } => commands::lab::execute(config, experiment, trials, seed, output),
        Commands::Achievements => commands::achievements::execute(config),
        Commands::Validate { content } => commands::validate::execute(content),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
