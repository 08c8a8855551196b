use clap::{Parser, Subcommand};
use std::{path::PathBuf, process::ExitCode};
use sweep_runner::{
    config::{ExecutorConfig, SweepConfig},
    executors::Executors,
    generate::generate,
    layout::relative_dir,
    logging,
    plan::Plan,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Generates and submits a node x size x thread sweep of the simulation
struct Cli {
    /// Path to YAML file with the sweep configuration
    #[arg(short, long)]
    config: PathBuf,

    /// Increase log verbosity, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the configuration matrix without touching the filesystem
    Plan,
    /// Create all configuration directories and submit their jobs
    Generate {
        /// Write submission files but don't call the scheduler
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = match SweepConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load {:?}: {e}", cli.config);
            return ExitCode::FAILURE;
        }
    };

    if config.preflight_checks() {
        error!("Aborting, fix the errors above first");
        return ExitCode::FAILURE;
    }

    if let Commands::Generate { dry_run: true } = cli.command {
        config.executor = ExecutorConfig::DryRun;
    }

    let plan = match Plan::from_config(&config) {
        Ok(plan) => plan,
        Err(e) => {
            error!("Failed to prepare sweep: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Plan => {
            for job in plan.jobs() {
                println!(
                    "{}\t{}\t{}",
                    relative_dir(&job.configuration.id()).display(),
                    job.job_name,
                    job.time
                );
            }
            info!("{} configurations", plan.sweep.len());

            ExitCode::SUCCESS
        }
        Commands::Generate { .. } => {
            let executor = Executors::load(&config.executor);

            match generate(&plan, &executor) {
                Ok(_) => ExitCode::SUCCESS,
                Err(e) => {
                    error!("Sweep aborted: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
