use crate::{
    executors::Executors,
    layout::{LayoutError, TreeBuilder},
    plan::Plan,
    template::{write_job_file, TemplateError},
};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("{count} configurations collide with an existing tree, first: {first}")]
    Collisions { count: usize, first: LayoutError },
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Outcome of materializing and submitting a sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub generated: usize,
    pub submitted: usize,
    pub failed: usize,
}

/// Check every segment of every configuration directory before anything is written.
/// A sweep with collisions is rejected as a whole so no partial tree is left behind.
pub fn check_collisions(plan: &Plan) -> Result<(), GenerateError> {
    let mut collisions = plan
        .jobs()
        .filter_map(|job| plan.layout.check_free(&job.configuration.id()).err())
        .inspect(|collision| error!("{collision}"));

    match collisions.next() {
        Some(first) => Err(GenerateError::Collisions {
            count: 1 + collisions.count(),
            first,
        }),
        None => Ok(()),
    }
}

/// Materialize every configuration of the plan and submit it.
///
/// Runs strictly sequentially: a configuration's directory and submission file are complete
/// before it is submitted and before the next configuration is touched. Directory or file
/// errors abort the sweep, rejected submissions are logged and skipped.
#[instrument(skip_all, fields(root = ?plan.root()), level = "info")]
pub fn generate(plan: &Plan, executor: &Executors) -> Result<GenerateSummary, GenerateError> {
    check_collisions(plan)?;

    let total = plan.sweep.len();
    let mut summary = GenerateSummary::default();
    let mut tree = TreeBuilder::new(plan.root());

    for job in plan.jobs() {
        let directory = tree.create(&job.configuration.id())?;
        let job_file = job.job_file(&plan.job_file);

        write_job_file(&job_file, &plan.render(&job))?;
        summary.generated += 1;
        debug!(file = ?job_file, "Wrote submission file");

        match executor.submit(&job_file) {
            Ok(submission) => {
                summary.submitted += 1;
                match submission.job_id {
                    Some(id) => info!(job = %job.job_name, id, "Submitted"),
                    None => info!(job = %job.job_name, "Submitted"),
                }
            }
            Err(failure) => {
                summary.failed += 1;
                warn!(directory = ?directory, "Submission failed, continuing: {failure}");
            }
        }

        info!("Done with {}/{total}", summary.generated);
    }

    if summary.failed > 0 {
        warn!(
            "{} of {} submissions failed, resubmit them from their directories",
            summary.failed, summary.generated
        );
    }
    info!(
        generated = summary.generated,
        submitted = summary.submitted,
        failed = summary.failed,
        "Done with generating"
    );

    Ok(summary)
}
