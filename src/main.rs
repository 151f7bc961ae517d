//! Creature Sim - Entry Point
//!
//! Reads a scene stream from a file or stdin, runs it headless and prints the
//! end-of-run report on stdout. Diagnostics go to stderr.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use creature_sim::core::config::SimulationConfig;
use creature_sim::core::error::Result;
use creature_sim::input::{load_scene, TokenReader};
use creature_sim::simulation::{Environment, RunReport, Simulation};

/// Headless creature simulator
#[derive(Parser, Debug)]
#[command(name = "creature-sim")]
#[command(about = "Run a declarative creature scene and report sensor histories")]
struct Args {
    /// Scene stream to read (stdin when omitted)
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// TOML file with base simulation parameters
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Override the tick budget from the scene
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Print the report as JSON instead of a single line
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("creature_sim=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(report) => {
            if args.json {
                match report.to_json() {
                    Ok(json) => println!("{}", json),
                    Err(err) => {
                        tracing::error!(error = %err, "Failed to encode report");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                println!("{}", report);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Simulation aborted");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<RunReport> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_toml_file(path)?,
        None => SimulationConfig::default(),
    };

    let source: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    };
    let mut reader = TokenReader::new(BufReader::new(source));
    let mut environment = Environment::new();
    load_scene(&mut reader, &mut environment, &mut config)?;

    if let Some(max_ticks) = args.max_ticks {
        config.eval_steps = max_ticks;
    }

    let mut simulation = Simulation::with_sandbox(config, environment)?;
    simulation.run()
}
