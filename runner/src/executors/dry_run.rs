use super::{Submission, SubmissionFailure};
use std::path::Path;
use tracing::info;

/// Leaves submission files on disk without calling a scheduler
#[derive(Debug, Clone, Default)]
pub struct DryRunExecutor;

impl DryRunExecutor {
    pub fn submit(&self, job_file: &Path) -> Result<Submission, SubmissionFailure> {
        info!(file = ?job_file, "Dry run, not submitting");

        Ok(Submission::default())
    }
}
