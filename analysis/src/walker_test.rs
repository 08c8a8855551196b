use crate::{walker::discover, AnalysisError};
use std::fs;
use sweep_runner::sweep::{RunId, Size};

#[test]
pub fn finds_run_directories_in_name_order() {
    let root = tempfile::tempdir().unwrap();
    for dir in [
        "n-4/s-2048-2048/t-32/output",
        "n-1/s-2048-2048/t-64/output",
        "n-1/s-2048-2048/t-32/output",
        "n-1/s-2048-2048/t-32/images",
        "n-1/s-8192-4096/t-32/output",
    ] {
        fs::create_dir_all(root.path().join(dir)).unwrap();
    }

    let discovery = discover(root.path()).unwrap();
    let ids = discovery.runs.iter().map(|run| run.id).collect::<Vec<_>>();

    let id = |nodes, x, y, threads| RunId {
        nodes,
        size: Size::new(x, y),
        threads,
    };
    assert_eq!(
        ids,
        vec![
            id(1, 2048, 2048, 32),
            id(1, 2048, 2048, 64),
            id(1, 8192, 4096, 32),
            id(4, 2048, 2048, 32),
        ]
    );
    assert_eq!(discovery.malformed, 0);
    assert!(discovery.runs[0].path.ends_with("n-1/s-2048-2048/t-32/output"));
}

#[test]
pub fn skips_malformed_run_directories() {
    let root = tempfile::tempdir().unwrap();
    for dir in [
        "n-4/s-2048-2048/t-32/output",
        "n-4/s-2048/t-32/output",
        "planet/output",
        "n-4/s-2048-2048/t-32/images/output",
    ] {
        fs::create_dir_all(root.path().join(dir)).unwrap();
    }
    // a file named output is not a run directory
    fs::write(root.path().join("n-4/output"), "").unwrap();

    let discovery = discover(root.path()).unwrap();

    assert_eq!(discovery.runs.len(), 1);
    assert_eq!(discovery.malformed, 2);
}

#[test]
pub fn hidden_sweeps_are_walked() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join(".old/n-2/s-64-64/t-1/output")).unwrap();
    fs::write(root.path().join(".gitignore"), "*\n").unwrap();

    assert_eq!(discover(root.path()).unwrap().runs.len(), 1);
}

#[test]
pub fn missing_root() {
    let root = tempfile::tempdir().unwrap();

    assert!(matches!(
        discover(&root.path().join("nope")),
        Err(AnalysisError::RootNotFound(_))
    ));
}
