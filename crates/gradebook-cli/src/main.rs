//! The `gradebook` command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "gradebook", version, about = "Transcript GPA calculator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate GPA and completed hours from a transcript
    Calculate {
        /// Transcript JSON (registrar response or array of rows)
        #[arg(long)]
        transcript: PathBuf,

        /// Curriculum JSON containing every branch
        #[arg(long)]
        curriculum: Option<PathBuf>,

        /// Branch: general, software-engineering
        #[arg(long)]
        branch: Option<String>,

        /// Show only this semester key ("all" for every semester)
        #[arg(long)]
        semester: Option<String>,

        /// Output format: text, json, markdown, html
        #[arg(long)]
        format: Option<String>,

        /// Write the rendered output to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a curriculum file for data issues
    Validate {
        /// Curriculum JSON containing every branch
        #[arg(long)]
        curriculum: Option<PathBuf>,

        /// Validate a single branch (default: every branch present)
        #[arg(long)]
        branch: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config, curriculum, and transcript files
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradebook=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Calculate {
            transcript,
            curriculum,
            branch,
            semester,
            format,
            output,
            config,
        } => commands::calculate::execute(commands::calculate::CalculateArgs {
            transcript,
            curriculum,
            branch,
            semester,
            format,
            output,
            config,
        }),
        Commands::Validate {
            curriculum,
            branch,
            config,
        } => commands::validate::execute(curriculum, branch, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
