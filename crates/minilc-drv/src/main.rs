//! `minilc` — the MiniLang compiler driver's command-line entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use minilc_drv::{run_stage, Stage};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// MiniLang compiler driver.
#[derive(Parser, Debug)]
#[command(name = "minilc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lexes, parses, lowers, optimizes, and codegens a MiniLang source file")]
struct Cli {
    /// Path to the MiniLang source file.
    #[arg(short, long)]
    input: PathBuf,

    /// Which pipeline stage to run.
    #[arg(short, long, value_enum, default_value = "all")]
    stage: Stage,

    /// Raise the log level from info to debug.
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose { EnvFilter::new("debug") } else { EnvFilter::new("info") };
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_target(false)).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run_stage(cli.stage, &cli.input) {
        Ok(report) => {
            println!("Stage '{}' finished. Output folder: {}", report.stage.name(), report.output_dir.display());
            if report.generated.is_empty() {
                println!("No files were generated.");
            } else {
                println!("Generated files:");
                for path in &report.generated {
                    println!("  {}", path.display());
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
