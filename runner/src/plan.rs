use crate::{
    config::{ConfigErrors, SweepConfig},
    estimate::estimate,
    layout::TreeBuilder,
    sweep::{Configuration, Sweep},
    template::{JobParameters, JobTemplate},
};
use std::path::{Path, PathBuf};

/// Everything required to materialize a sweep, resolved from a `SweepConfig`
#[derive(Debug, Clone)]
pub struct Plan {
    pub sweep: Sweep,
    pub template: JobTemplate,
    pub layout: TreeBuilder,
    pub job_name: String,
    pub job_file: String,
    pub executable: PathBuf,
    pub dimensionality: u32,
    pub time_limit: Option<String>,
}

/// A configuration together with its resolved job settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedJob {
    pub configuration: Configuration,
    pub directory: PathBuf,
    pub job_name: String,
    pub time: String,
}

impl PlannedJob {
    pub fn job_file(&self, file_name: &str) -> PathBuf {
        self.directory.join(file_name)
    }
}

/// `<prefix>-<nodes>_nodes-<size>_size-<threads>_threads`
pub fn job_name(prefix: &str, configuration: &Configuration) -> String {
    let size = &configuration.size;

    if size.is_square() {
        format!(
            "{prefix}-{}_nodes-{}_size-{}_threads",
            configuration.nodes, size.x, configuration.threads
        )
    } else {
        format!(
            "{prefix}-{}_nodes-{}-times-{}_size-{}_threads",
            configuration.nodes, size.x, size.y, configuration.threads
        )
    }
}

impl Plan {
    pub fn from_config(config: &SweepConfig) -> Result<Self, ConfigErrors> {
        Ok(Self {
            sweep: config.sweep()?,
            template: config.load_template()?,
            layout: TreeBuilder::new(&config.root),
            job_name: config.job.name.clone(),
            job_file: config.job.file.clone(),
            executable: config.job.executable.clone(),
            dimensionality: config.job.dimensionality,
            time_limit: config.job.time_limit.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// time limit passed to the scheduler, fixed if configured and estimated otherwise
    pub fn time_limit(&self, configuration: &Configuration) -> String {
        match &self.time_limit {
            Some(limit) => limit.clone(),
            None => estimate(configuration.nodes, configuration.size, configuration.threads)
                .to_string(),
        }
    }

    pub fn jobs(&self) -> impl Iterator<Item = PlannedJob> + '_ {
        self.sweep
            .configurations()
            .map(move |configuration| PlannedJob {
                directory: self.layout.path(&configuration.id()),
                job_name: job_name(&self.job_name, &configuration),
                time: self.time_limit(&configuration),
                configuration,
            })
    }

    pub fn render(&self, job: &PlannedJob) -> String {
        self.template.render(&JobParameters {
            job_name: &job.job_name,
            configuration: &job.configuration,
            dimensionality: self.dimensionality,
            time: &job.time,
            executable: &self.executable,
            directory: &job.directory,
        })
    }
}
