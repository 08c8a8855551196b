use crate::{aggregate::Aggregate, walker::RunDirectory};
use globset::GlobMatcher;
use itertools::Itertools;
use std::{fs, path::PathBuf};
use sweep_ingest::scan_file;
use tracing::{debug, warn};

/// Result of parsing every log file of one run directory
#[derive(Debug, Clone)]
pub struct RunScan {
    pub run: RunDirectory,
    pub aggregate: Aggregate,
    pub files: usize,
    pub skipped_files: usize,
    pub skipped_lines: usize,
}

/// Parse all files of a run directory whose name matches `logs`.
/// Unreadable files are skipped and counted, a run still being written to is fine.
pub fn scan_run(run: &RunDirectory, logs: &GlobMatcher) -> RunScan {
    let mut scan = RunScan {
        run: run.clone(),
        aggregate: Aggregate::default(),
        files: 0,
        skipped_files: 0,
        skipped_lines: 0,
    };

    let entries = match fs::read_dir(&run.path) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = ?run.path, "Failed to list run directory: {e}");
            scan.skipped_files += 1;
            return scan;
        }
    };

    let files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(path = ?run.path, "Failed to read directory entry: {e}");
                scan.skipped_files += 1;
                None
            }
        })
        .filter(|entry| entry.file_type().map_or(false, |kind| kind.is_file()))
        .filter(|entry| logs.is_match(entry.file_name()))
        .map(|entry| entry.path())
        .sorted()
        .collect();

    for file in files {
        match scan_file(&file) {
            Ok(log) => {
                scan.files += 1;
                scan.skipped_lines += log.malformed;
                scan.aggregate.extend(log.records);
            }
            Err(e) => {
                warn!(path = ?file, "Skipping unreadable log file: {e}");
                scan.skipped_files += 1;
            }
        }
    }

    debug!(
        path = ?run.path,
        files = scan.files,
        skipped_files = scan.skipped_files,
        skipped_lines = scan.skipped_lines,
        "Scanned run directory"
    );

    scan
}
