use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};
use sweep_runner::{
    config::{ExecutorConfig, SweepConfig},
    executors::Executors,
    generate::{generate, GenerateError, GenerateSummary},
    plan::Plan,
};

fn executable(path: &Path, body: &str) -> PathBuf {
    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    path.to_path_buf()
}

fn load(dir: &Path, threads: &str) -> SweepConfig {
    let simulation = executable(&dir.join("apocalypse"), "#!/bin/sh\n");
    let path = dir.join("sweep.yaml");
    fs::write(
        &path,
        format!(
            "
root: {root}/sweep
sweep:
  nodes: [1, 4]
  sizes: [2048, [8192, 4096]]
  threads: {threads}
  steps: 1000
job:
  executable: {simulation}
",
            root = dir.display(),
            simulation = simulation.display()
        ),
    )
    .unwrap();

    let config = SweepConfig::load(&path).unwrap();
    assert!(!config.preflight_checks());
    config
}

#[test]
fn builds_and_submits_every_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let scheduler = executable(
        &dir.path().join("sbatch"),
        "#!/bin/sh\necho \"$(pwd -P)/$1\" >> \"$(dirname \"$0\")/submitted\"\necho Submitted batch job 1\n",
    );
    let config = load(dir.path(), "[32, 64]");
    let plan = Plan::from_config(&config).unwrap();
    let executor = Executors::load(&ExecutorConfig::Slurm {
        command: scheduler.display().to_string(),
        args: Vec::new(),
        timeout: 10,
    });

    let summary = generate(&plan, &executor).unwrap();

    assert_eq!(
        summary,
        GenerateSummary {
            generated: 8,
            submitted: 8,
            failed: 0
        }
    );

    let root = dir.path().join("sweep");
    let leaf = root.join("n-4/s-8192-4096/t-64");
    assert!(leaf.join("images").is_dir());
    assert!(leaf.join("output").is_dir());

    let job = fs::read_to_string(leaf.join("apocalypse.sbatch")).unwrap();
    assert!(job.contains("#SBATCH --nodes=4\n"));
    assert!(job.contains("export OMP_NUM_THREADS=64\n"));
    assert!(job.contains(" 8192 4096 2 1000\n"));
    // 5 * 8 / 4 * 2
    assert!(job.contains("#SBATCH --time=20\n"));

    let submitted = fs::read_to_string(dir.path().join("submitted")).unwrap();
    let submitted = submitted.lines().collect::<Vec<_>>();
    assert_eq!(submitted.len(), 8);
    assert!(submitted[0].ends_with("n-1/s-2048-2048/t-32/apocalypse.sbatch"));
    assert!(submitted[7].ends_with("n-4/s-8192-4096/t-64/apocalypse.sbatch"));
}

#[test]
fn failed_submissions_do_not_stop_the_sweep() {
    let dir = tempfile::tempdir().unwrap();
    // reject every job of the single node configurations
    let scheduler = executable(
        &dir.path().join("sbatch"),
        "#!/bin/sh\ncase \"$(pwd -P)\" in */n-1/*) exit 1;; esac\necho Submitted batch job 5\n",
    );
    let config = load(dir.path(), "[32]");
    let plan = Plan::from_config(&config).unwrap();
    let executor = Executors::load(&ExecutorConfig::Slurm {
        command: scheduler.display().to_string(),
        args: Vec::new(),
        timeout: 10,
    });

    let summary = generate(&plan, &executor).unwrap();

    assert_eq!(summary.generated, 4);
    assert_eq!(summary.submitted, 2);
    assert_eq!(summary.failed, 2);
}

#[test]
fn existing_configuration_aborts_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let config = load(dir.path(), "[32, 64]");
    let plan = Plan::from_config(&config).unwrap();
    let executor = Executors::load(&ExecutorConfig::DryRun);

    fs::create_dir_all(dir.path().join("sweep/n-4/s-2048-2048/t-64")).unwrap();

    match generate(&plan, &executor) {
        // every configuration below the existing n-4 collides
        Err(GenerateError::Collisions { count, .. }) => assert_eq!(count, 4),
        other => panic!("expected a collision, got {other:?}"),
    }
    assert!(!dir.path().join("sweep/n-1").exists());

    // a finished sweep can't be generated twice
    fs::remove_dir_all(dir.path().join("sweep")).unwrap();
    generate(&plan, &executor).unwrap();
    assert!(matches!(
        generate(&plan, &executor),
        Err(GenerateError::Collisions { count: 8, .. })
    ));
}

#[test]
fn previous_sweep_tree_is_not_merged() {
    let dir = tempfile::tempdir().unwrap();
    let config = load(dir.path(), "[32]");
    let plan = Plan::from_config(&config).unwrap();
    let executor = Executors::load(&ExecutorConfig::DryRun);

    let previous = dir.path().join("sweep/n-1/s-2048-2048/t-64/output");
    fs::create_dir_all(&previous).unwrap();
    fs::write(previous.join("slurm-1.err"), "TIME: Simulation took 1 milliseconds\n").unwrap();

    match generate(&plan, &executor) {
        Err(GenerateError::Collisions { count, .. }) => assert_eq!(count, 2),
        other => panic!("expected a collision, got {other:?}"),
    }

    let entries = fs::read_dir(dir.path().join("sweep/n-1/s-2048-2048"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect::<Vec<_>>();
    assert_eq!(entries, vec!["t-64"]);
    assert!(!dir.path().join("sweep/n-4").exists());
}
