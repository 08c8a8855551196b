mod dry_run;
mod slurm;

use crate::config::ExecutorConfig;
use std::{io, path::Path, time::Duration};
use thiserror::Error;

pub use dry_run::DryRunExecutor;
pub use slurm::SlurmExecutor;

#[derive(Error, Debug)]
pub enum SubmissionFailure {
    #[error("Submission file {0:?} has no parent directory")]
    NoDirectory(std::path::PathBuf),
    #[error("Failed to spawn {command}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to wait for {command}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("{command} did not finish within {timeout:?}")]
    Timeout { command: String, timeout: Duration },
    #[error("{command} rejected the job ({status}): {stderr}")]
    Rejected {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Receipt of an accepted submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    /// scheduler job id if the scheduler reported one
    pub job_id: Option<u64>,
}

#[derive(Clone, Debug)]
pub enum Executors {
    Slurm(SlurmExecutor),
    DryRun(DryRunExecutor),
}

impl Executors {
    pub fn load(config: &ExecutorConfig) -> Self {
        match config {
            ExecutorConfig::Slurm {
                command,
                args,
                timeout,
            } => Self::Slurm(SlurmExecutor::new(
                command.clone(),
                args.clone(),
                Duration::from_secs(*timeout),
            )),
            ExecutorConfig::DryRun => Self::DryRun(DryRunExecutor),
        }
    }

    /// Hand a written submission file to the scheduler. Returns once the scheduler accepted
    /// or rejected the job, never waits for the job itself.
    pub fn submit(&self, job_file: &Path) -> Result<Submission, SubmissionFailure> {
        match self {
            Self::Slurm(executor) => executor.submit(job_file),
            Self::DryRun(executor) => executor.submit(job_file),
        }
    }
}

#[cfg(test)]
mod slurm_test;
