use clap::Parser;
use std::{
    io::{self, BufWriter},
    path::PathBuf,
    process::ExitCode,
};
use sweep_analysis::{
    analyze::{analyze, Options},
    report::write_report,
};
use sweep_runner::{config::SweepConfig, logging};
use tracing::error;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Aggregates the logs of a finished sweep into a tab separated report on stdout
struct Cli {
    /// Root directory of the sweep
    #[arg(default_value = ".")]
    root: PathBuf,

    /// File name glob of the log files inside each output directory
    #[arg(short, long, default_value = "*.err")]
    logs: String,

    /// Number of threads to use (default - use all available cores)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Sort rows by nodes, size and threads instead of directory order
    #[arg(short, long)]
    sort: bool,

    /// Sweep configuration, used to report configurations that never ran
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut options = Options::new(cli.root);
    options.logs = cli.logs;
    options.threads = cli.threads;
    options.sort = cli.sort;

    if let Some(path) = cli.config {
        match SweepConfig::load(&path).map(|config| config.sweep()) {
            Ok(Ok(sweep)) => {
                options.expected = Some(sweep.configurations().map(|c| c.id()).collect());
            }
            Ok(Err(e)) => {
                error!("Sweep in {path:?} is invalid: {e}");
                return ExitCode::FAILURE;
            }
            Err(e) => {
                error!("Failed to load {path:?}: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let analysis = match analyze(&options) {
        Ok(analysis) => analysis,
        Err(e) => {
            error!("Analysis failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    match write_report(BufWriter::new(io::stdout().lock()), &analysis.summaries) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to write report: {e}");
            ExitCode::FAILURE
        }
    }
}
