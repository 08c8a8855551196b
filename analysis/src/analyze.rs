use crate::{
    aggregate::ConfigurationSummary,
    scan::{scan_run, RunScan},
    walker::discover,
    AnalysisError,
};
use globset::GlobBuilder;
use rayon::{prelude::*, ThreadPoolBuilder};
use std::{collections::BTreeSet, path::PathBuf};
use sweep_runner::sweep::RunId;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct Options {
    pub root: PathBuf,
    /// file name glob of the logs inside a run directory
    pub logs: String,
    /// scan threads, all cores when unset
    pub threads: Option<usize>,
    /// order rows by (nodes, size, threads) instead of walk order
    pub sort: bool,
    /// configurations the sweep was generated with, to report runs that never happened
    pub expected: Option<Vec<RunId>>,
}

impl Options {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            logs: String::from("*.err"),
            threads: None,
            sort: false,
            expected: None,
        }
    }
}

/// Counters of everything that was left out of the report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Skipped {
    pub malformed_dirs: usize,
    pub unreadable: usize,
    pub files: usize,
    pub lines: usize,
    pub incomplete: usize,
    pub missing: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub summaries: Vec<ConfigurationSummary>,
    pub runs: usize,
    pub skipped: Skipped,
}

/// Walk a sweep, parse all run directories concurrently and reduce them to summaries.
///
/// Rows keep walk order unless sorting was requested. Incomplete configurations are left
/// out and logged.
#[instrument(skip_all, fields(root = ?options.root), level = "info")]
pub fn analyze(options: &Options) -> Result<Analysis, AnalysisError> {
    let logs = GlobBuilder::new(&options.logs)
        .literal_separator(true)
        .build()?
        .compile_matcher();

    let discovery = discover(&options.root)?;
    let mut analysis = Analysis {
        runs: discovery.runs.len(),
        ..Analysis::default()
    };
    analysis.skipped.malformed_dirs = discovery.malformed;
    analysis.skipped.unreadable = discovery.unreadable;

    let mut pool = ThreadPoolBuilder::new();
    if let Some(threads) = options.threads {
        pool = pool.num_threads(threads);
    }
    let scans: Vec<RunScan> = pool
        .build()?
        .install(|| discovery.runs.par_iter().map(|run| scan_run(run, &logs)).collect());

    for scan in &scans {
        analysis.skipped.files += scan.skipped_files;
        analysis.skipped.lines += scan.skipped_lines;

        match scan.aggregate.summarize(scan.run.id) {
            Ok(summary) => analysis.summaries.push(summary),
            Err(e) => {
                warn!(
                    path = ?scan.run.path,
                    files = scan.files,
                    "Leaving incomplete configuration out of the report: {e}"
                );
                analysis.skipped.incomplete += 1;
            }
        }
    }

    if let Some(expected) = &options.expected {
        let found = scans.iter().map(|scan| scan.run.id).collect::<BTreeSet<_>>();

        for id in expected.iter().filter(|id| !found.contains(id)) {
            warn!(
                nodes = id.nodes,
                size = %id.size,
                threads = id.threads,
                "Configuration has no run directory, the job never ran"
            );
            analysis.skipped.missing += 1;
        }
    }

    if options.sort {
        analysis.summaries.sort_by_key(|summary| summary.id);
    }

    let skipped = &analysis.skipped;
    if skipped != &Skipped::default() {
        warn!(
            malformed_dirs = skipped.malformed_dirs,
            unreadable = skipped.unreadable,
            files = skipped.files,
            lines = skipped.lines,
            incomplete = skipped.incomplete,
            missing = skipped.missing,
            "Skipped parts of the sweep"
        );
    }
    info!(
        runs = analysis.runs,
        rows = analysis.summaries.len(),
        "Done with analysis"
    );

    Ok(analysis)
}
