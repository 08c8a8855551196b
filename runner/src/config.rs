use crate::{
    sweep::{Size, Sweep, SweepDimension, SweepError},
    template::{JobTemplate, Placeholder, TemplateError},
};
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Error,
    os::unix::fs::MetadataExt,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{error, warn};

// check if a file is executable
pub fn check_executable(path: &Path) -> Result<bool, ConfigErrors> {
    if !path.is_file() {
        Err(ConfigErrors::FileNotFound(path.to_path_buf()))
    } else {
        match File::open(path).map(|file| file.metadata()) {
            Ok(Ok(metadata)) => Ok((metadata.mode() & 0o111) != 0),
            Ok(Err(e)) | Err(e) => Err(ConfigErrors::MetadataNotFound(e)),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigErrors {
    #[error("Failed to read config {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: Error,
    },
    #[error("Failed to parse config")]
    Parse(#[from] serde_yaml::Error),
    #[error("File not found: {0:?}")]
    FileNotFound(PathBuf),
    #[error("Metadata not found")]
    MetadataNotFound(#[source] Error),
    #[error("Invalid sweep")]
    Sweep(#[from] SweepError),
    #[error("Invalid job template")]
    Template(#[from] TemplateError),
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    // root directory all configuration directories are created below
    pub root: PathBuf,
    // the experiment matrix
    pub sweep: DimensionsConfig,
    // how a single configuration is turned into a submission file
    pub job: JobConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct DimensionsConfig {
    pub nodes: Vec<u32>,
    pub sizes: Vec<SizeValue>,
    pub threads: Vec<u32>,
    pub steps: u64,
}

/// A world size, either a square edge or an explicit `[x, y]` pair
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum SizeValue {
    Square(u32),
    Rectangle([u32; 2]),
}

impl From<SizeValue> for Size {
    fn from(value: SizeValue) -> Self {
        match value {
            SizeValue::Square(edge) => Size::square(edge),
            SizeValue::Rectangle([x, y]) => Size::new(x, y),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    // prefix of every scheduler job name
    #[serde(default = "default_job_name")]
    pub name: String,
    // file name of the submission file inside each configuration directory
    #[serde(default = "default_job_file")]
    pub file: String,
    pub executable: PathBuf,
    #[serde(default = "default_dimensionality")]
    pub dimensionality: u32,
    // optional path to a template replacing the built-in one
    pub template: Option<PathBuf>,
    // fixed scheduler time limit, replaces the runtime estimate when set
    pub time_limit: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ExecutorConfig {
    /// hand every submission file to a batch scheduler command
    Slurm {
        #[serde(default = "default_submit_command")]
        command: String,
        #[serde(default)]
        args: Vec<String>,
        /// seconds to wait for the scheduler command
        #[serde(default = "default_submit_timeout")]
        timeout: u64,
    },
    /// write everything, submit nothing
    DryRun,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self::Slurm {
            command: default_submit_command(),
            args: Vec::new(),
            timeout: default_submit_timeout(),
        }
    }
}

impl SweepConfig {
    /// Load a config from a YAML file, relative paths are resolved against the working directory
    pub fn load(path: &Path) -> Result<Self, ConfigErrors> {
        let content = fs::read_to_string(path).map_err(|source| ConfigErrors::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = serde_yaml::from_str(&content)?;

        let cwd = env::current_dir().map_err(|source| ConfigErrors::Read {
            path: PathBuf::from("."),
            source,
        })?;
        config.root = cwd.join(&config.root);
        config.job.executable = cwd.join(&config.job.executable);
        config.job.template = config.job.template.map(|template| cwd.join(template));

        Ok(config)
    }

    /// build the validated experiment matrix
    pub fn sweep(&self) -> Result<Sweep, SweepError> {
        Sweep::new(
            self.sweep.nodes.clone(),
            self.sweep.sizes.iter().copied().map(Size::from).collect(),
            self.sweep.threads.clone(),
            self.sweep.steps,
        )
    }

    /// load the configured template or fall back to the built-in one
    pub fn load_template(&self) -> Result<JobTemplate, ConfigErrors> {
        match &self.job.template {
            Some(path) => fs::read_to_string(path)
                .map_err(|source| ConfigErrors::Read {
                    path: path.clone(),
                    source,
                })?
                .parse::<JobTemplate>()
                .map_err(ConfigErrors::from),
            None => Ok(JobTemplate::builtin()?),
        }
    }

    /// Check the whole config and report every problem at once.
    /// Returns true if the config contains an error.
    pub fn preflight_checks(&self) -> bool {
        // attempt to catch all errors instead of piece-by-piece to make debugging easier for users
        let mut contains_error = false;

        let dimensions = [
            SweepDimension::new("nodes", self.sweep.nodes.clone()).err(),
            SweepDimension::new(
                "sizes",
                self.sweep.sizes.iter().copied().map(Size::from).collect(),
            )
            .err(),
            SweepDimension::new("threads", self.sweep.threads.clone()).err(),
        ];
        for error in dimensions.into_iter().flatten() {
            error!("sweep: {error}");
            contains_error = true;
        }

        if self.sweep.steps == 0 {
            error!("sweep.steps cannot be 0, the simulation would not run");
            contains_error = true;
        }

        let file = Path::new(&self.job.file);
        if self.job.file.is_empty() || file.components().count() != 1 || file.file_name().is_none()
        {
            error!(
                "job.file ({}) must be a plain file name inside the configuration directory",
                self.job.file
            );
            contains_error = true;
        } else if self.job.file == crate::layout::IMAGES_DIR
            || self.job.file == crate::layout::OUTPUT_DIR
        {
            error!(
                "job.file ({}) collides with a reserved directory name",
                self.job.file
            );
            contains_error = true;
        }

        if self.job.name.is_empty() {
            error!("job.name cannot be empty");
            contains_error = true;
        }

        if self.job.dimensionality == 0 {
            error!("job.dimensionality cannot be 0");
            contains_error = true;
        }

        if let Some(time_limit) = &self.job.time_limit {
            if time_limit.trim().is_empty() {
                error!("job.time_limit is set but empty, remove it to use the runtime estimate");
                contains_error = true;
            }
        }

        match check_executable(&self.job.executable) {
            Ok(true) => {}
            Ok(false) => {
                error!(
                    "job.executable {} is not executable",
                    self.job.executable.to_string_lossy()
                );
                contains_error = true;
            }
            Err(e) => {
                error!(
                    "Failed to determine if job.executable ({}) is an executable: {e}",
                    self.job.executable.to_string_lossy()
                );
                contains_error = true;
            }
        }

        match self.load_template() {
            Ok(template) => {
                if !template
                    .placeholders()
                    .any(|placeholder| placeholder == Placeholder::Executable)
                {
                    warn!("job.template never references {{executable}}, the jobs will not run the simulation");
                }
            }
            Err(e) => {
                error!("job.template could not be loaded: {e}");
                contains_error = true;
            }
        }

        if let ExecutorConfig::Slurm { command, timeout, .. } = &self.executor {
            if command.is_empty() {
                error!("executor.command cannot be empty");
                contains_error = true;
            }

            if *timeout == 0 {
                warn!("executor.timeout is 0, every submission will time out");
            }
        }

        if self.root.is_file() {
            error!(
                "root {} is a file, not a directory",
                self.root.to_string_lossy()
            );
            contains_error = true;
        }

        contains_error
    }
}

fn default_job_name() -> String {
    String::from("ZombieApocalypse")
}

fn default_job_file() -> String {
    String::from("apocalypse.sbatch")
}

fn default_dimensionality() -> u32 {
    2
}

fn default_submit_command() -> String {
    String::from("sbatch")
}

fn default_submit_timeout() -> u64 {
    30
}
