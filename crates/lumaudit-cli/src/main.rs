use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{cmd_analyze, cmd_build, cmd_run};

#[derive(Parser)]
#[command(name = "lumaudit")]
#[command(version, about = "Image collection quality auditor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a labeled image directory and write the metrics table
    Build {
        /// Dataset root containing one subdirectory per label
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Output path for the metrics table
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Number of parallel threads
        #[arg(short = 'j', long, value_name = "N")]
        threads: Option<usize>,

        /// Suppress progress and summary output
        #[arg(long)]
        silent: bool,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Classify a metrics table and print the audit report
    Analyze {
        /// Metrics table to read (defaults to the configured build output)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output path for the annotated table
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Suppress the report and summary output
        #[arg(long)]
        silent: bool,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Build the metrics table and analyze it in one pass
    Run {
        /// Dataset root containing one subdirectory per label
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Output path for the metrics table
        #[arg(long, value_name = "FILE")]
        metrics_out: Option<PathBuf>,

        /// Output path for the annotated table
        #[arg(long, value_name = "FILE")]
        annotated_out: Option<PathBuf>,

        /// Number of parallel threads
        #[arg(short = 'j', long, value_name = "N")]
        threads: Option<usize>,

        /// Suppress progress and report output
        #[arg(long)]
        silent: bool,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            root,
            output,
            threads,
            silent,
            verbose,
        } => cmd_build(root, output, threads, silent, verbose),

        Commands::Analyze {
            input,
            output,
            silent,
            verbose,
        } => cmd_analyze(input, output, silent, verbose),

        Commands::Run {
            root,
            metrics_out,
            annotated_out,
            threads,
            silent,
            verbose,
        } => cmd_run(root, metrics_out, annotated_out, threads, silent, verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
