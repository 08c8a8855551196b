use super::{
    slurm::{parse_job_id, SlurmExecutor},
    Executors, SubmissionFailure,
};
use crate::config::ExecutorConfig;
use std::{fs, time::Duration};

fn shell(script: &str, timeout: Duration) -> SlurmExecutor {
    SlurmExecutor::new(
        String::from("sh"),
        vec![String::from("-c"), script.to_owned(), String::from("sh")],
        timeout,
    )
}

#[test]
pub fn job_ids() {
    assert_eq!(parse_job_id("Submitted batch job 123456\n"), Some(123456));
    assert_eq!(parse_job_id("warning: foo\nSubmitted batch job 7"), Some(7));
    assert_eq!(parse_job_id("123456;cluster"), None);
    assert_eq!(parse_job_id(""), None);
}

#[test]
pub fn submits_from_configuration_directory() {
    let dir = tempfile::tempdir().unwrap();
    let job_file = dir.path().join("apocalypse.sbatch");
    fs::write(&job_file, "#!/bin/bash\n").unwrap();

    // the file is passed by name, relative to the working directory
    let executor = shell(
        "test -f \"$1\" && touch submitted && echo Submitted batch job 42",
        Duration::from_secs(10),
    );

    let submission = executor.submit(&job_file).unwrap();

    assert_eq!(submission.job_id, Some(42));
    assert!(dir.path().join("submitted").is_file());
}

#[test]
pub fn non_utf8_output_keeps_job_id() {
    let dir = tempfile::tempdir().unwrap();
    let job_file = dir.path().join("apocalypse.sbatch");
    fs::write(&job_file, "").unwrap();

    let executor = shell(
        "printf 'sbatch: \\377\\n'; echo Submitted batch job 9",
        Duration::from_secs(10),
    );

    assert_eq!(executor.submit(&job_file).unwrap().job_id, Some(9));
}

#[test]
pub fn rejected_submission() {
    let dir = tempfile::tempdir().unwrap();
    let job_file = dir.path().join("apocalypse.sbatch");
    fs::write(&job_file, "").unwrap();

    let executor = shell("echo 'invalid partition' >&2; exit 1", Duration::from_secs(10));

    match executor.submit(&job_file) {
        Err(SubmissionFailure::Rejected { stderr, .. }) => assert_eq!(stderr, "invalid partition"),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
pub fn hanging_scheduler_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let job_file = dir.path().join("apocalypse.sbatch");
    fs::write(&job_file, "").unwrap();

    let executor = shell("sleep 10", Duration::from_millis(200));

    assert!(matches!(
        executor.submit(&job_file),
        Err(SubmissionFailure::Timeout { .. })
    ));
}

#[test]
pub fn missing_command() {
    let dir = tempfile::tempdir().unwrap();
    let executor = Executors::load(&ExecutorConfig::Slurm {
        command: String::from("/nonexistent/sbatch"),
        args: Vec::new(),
        timeout: 1,
    });

    assert!(matches!(
        executor.submit(&dir.path().join("apocalypse.sbatch")),
        Err(SubmissionFailure::Spawn { .. })
    ));
}

#[test]
pub fn dry_run_accepts_everything() {
    let executor = Executors::load(&ExecutorConfig::DryRun);

    assert_eq!(
        executor
            .submit(std::path::Path::new("/nowhere/apocalypse.sbatch"))
            .unwrap()
            .job_id,
        None
    );
}
