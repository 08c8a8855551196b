pub mod aggregate;
pub mod analyze;
pub mod report;
pub mod scan;
pub mod walker;

#[cfg(test)]
mod report_test;
#[cfg(test)]
mod walker_test;

use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Sweep root {0:?} is not a directory")]
    RootNotFound(PathBuf),
    #[error("Invalid log glob")]
    InvalidGlob(#[from] globset::Error),
    #[error("Failed to start scan thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Failed to write report")]
    Report(#[from] io::Error),
}
