use super::{Submission, SubmissionFailure};
use std::{
    io::Read,
    path::Path,
    process::{Command, Stdio},
    time::Duration,
};
use tracing::{debug, instrument, warn};
use wait_timeout::ChildExt;

/// Drain a captured pipe. Read errors are logged and whatever was read is kept,
/// non UTF-8 output is replaced instead of discarded.
fn read_pipe(pipe: Option<impl Read>, name: &str) -> String {
    let mut buffer = Vec::new();
    if let Some(mut pipe) = pipe {
        if let Err(error) = pipe.read_to_end(&mut buffer) {
            warn!(error = ?error, pipe = name, "Failed to read scheduler output");
        }
    }

    String::from_utf8_lossy(&buffer).into_owned()
}

/// Submits jobs by calling `<command> [args..] <file>` inside the configuration directory
#[derive(Debug, Clone)]
pub struct SlurmExecutor {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

/// extract the id from sbatch's `Submitted batch job <id>`
pub fn parse_job_id(stdout: &str) -> Option<u64> {
    stdout.lines().find_map(|line| {
        line.trim()
            .strip_prefix("Submitted batch job")
            .and_then(|id| id.trim().parse().ok())
    })
}

impl SlurmExecutor {
    pub fn new(command: String, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            command,
            args,
            timeout,
        }
    }

    #[instrument(skip(self), level = "debug")]
    pub fn submit(&self, job_file: &Path) -> Result<Submission, SubmissionFailure> {
        let (Some(directory), Some(file_name)) = (job_file.parent(), job_file.file_name()) else {
            return Err(SubmissionFailure::NoDirectory(job_file.to_path_buf()));
        };

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .arg(file_name)
            // the scheduler picks up the job's working directory from its own
            .current_dir(directory)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SubmissionFailure::Spawn {
                command: self.command.clone(),
                source,
            })?;

        debug!("Scheduler command running as {}", child.id());

        let status = match child.wait_timeout(self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                if let Err(error) = child.kill().and_then(|()| child.wait().map(|_| ())) {
                    warn!(error = ?error, "Failed to kill timed out scheduler command");
                }

                return Err(SubmissionFailure::Timeout {
                    command: self.command.clone(),
                    timeout: self.timeout,
                });
            }
            Err(source) => {
                return Err(SubmissionFailure::Wait {
                    command: self.command.clone(),
                    source,
                })
            }
        };

        let stdout = read_pipe(child.stdout.take(), "stdout");
        let stderr = read_pipe(child.stderr.take(), "stderr");

        debug!(status = ?status, stdout = stdout.trim(), "Scheduler command finished");

        if status.success() {
            Ok(Submission {
                job_id: parse_job_id(&stdout),
            })
        } else {
            Err(SubmissionFailure::Rejected {
                command: self.command.clone(),
                status: status.to_string(),
                stderr: stderr.trim().to_owned(),
            })
        }
    }
}
