mod config;
mod plotting;
mod workflow;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Hydrogen permeation through coated samples
#[derive(Parser)]
#[command(name = "permeation")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Permeation experiment simulation and transport regime studies", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a two-layer permeation experiment with the external solver
    Simulate(RunArgs),
    /// Sweep the dimensionless permeation number of one material
    Regime(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Experiment or study YAML file
    #[arg(short, long)]
    config: PathBuf,

    /// Directory of material property YAML files
    #[arg(short, long, default_value = "data/properties")]
    properties: PathBuf,

    /// Root folder for timestamped run outputs
    #[arg(short, long, default_value = "data/runs")]
    output: PathBuf,
}

fn level_from(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level_from(&cli.log_level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Simulate(args) => simulate(args),
        Commands::Regime(args) => regime(args),
    }
}

fn simulate(args: RunArgs) -> Result<()> {
    let experiment = config::load_experiment(&args.config)?;
    let table = config::load_property_table(&args.properties)?;

    let run_folder = workflow::create_run_folder(&args.output, &experiment.name)?;
    workflow::archive_input(&args.config, &run_folder)?;

    workflow::run_permeation_experiment(&experiment, &table, &run_folder)
        .with_context(|| format!("Experiment '{}' failed", experiment.name))?;

    info!("Experiment complete. Results are in {:?}", run_folder);
    Ok(())
}

fn regime(args: RunArgs) -> Result<()> {
    let study = config::load_regime_study(&args.config)?;
    let table = config::load_property_table(&args.properties)?;

    let run_folder = workflow::create_run_folder(&args.output, &format!("regime_{}", study.material))?;
    workflow::archive_input(&args.config, &run_folder)?;

    workflow::run_regime_workflow(&study, &table, &run_folder)
        .with_context(|| format!("Regime study of '{}' failed", study.material))?;

    info!("Regime study complete. Results are in {:?}", run_folder);
    Ok(())
}
