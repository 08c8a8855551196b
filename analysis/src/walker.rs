use crate::AnalysisError;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use sweep_runner::{
    layout::{decode_run_dir, IMAGES_DIR, OUTPUT_DIR},
    sweep::RunId,
};
use tracing::{debug, warn};

/// A discovered `output` directory and the configuration it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirectory {
    pub id: RunId,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// run directories in walk order
    pub runs: Vec<RunDirectory>,
    /// `output` directories outside of the naming convention
    pub malformed: usize,
    /// entries the walk could not read
    pub unreadable: usize,
}

/// Recursively find all run directories below `root`, sorted by file name per level
pub fn discover(root: &Path) -> Result<Discovery, AnalysisError> {
    if !root.is_dir() {
        return Err(AnalysisError::RootNotFound(root.to_path_buf()));
    }

    let mut discovery = Discovery::default();
    let mut builder = WalkBuilder::new(root);

    builder
        // a sweep tree is not a source tree, don't apply ignore files or hide dot files
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        // images hold thousands of frames and never contain logs
        .filter_entry(|entry| entry.file_name() != IMAGES_DIR);

    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to walk part of the sweep: {e}");
                discovery.unreadable += 1;
                continue;
            }
        };

        let is_dir = entry.file_type().map_or(false, |kind| kind.is_dir());
        if !is_dir || entry.file_name() != OUTPUT_DIR {
            continue;
        }

        match decode_run_dir(entry.path()) {
            Ok(id) => {
                debug!(path = ?entry.path(), "Found run directory");
                discovery.runs.push(RunDirectory {
                    id,
                    path: entry.into_path(),
                });
            }
            Err(e) => {
                warn!("Skipping run directory: {e}");
                discovery.malformed += 1;
            }
        }
    }

    Ok(discovery)
}
