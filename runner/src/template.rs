use crate::sweep::Configuration;
use std::{
    fmt::Write as _,
    fs::OpenOptions,
    io::{self, Write},
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;

/// Submission file used when no template is configured
pub const DEFAULT_TEMPLATE: &str = r#"#!/bin/bash
#SBATCH --job-name="{job_name}"
#SBATCH --nodes={nodes}
# time is in minutes; see sbatch man page
#SBATCH --time={time}
#SBATCH --chdir="{directory}"
#SBATCH --output=output/slurm-%j.out
#SBATCH --error=output/slurm-%j.err

export OMP_NUM_THREADS={threads}
srun --ntasks-per-node=1 {executable} {size_x} {size_y} {dimensionality} {steps}
"#;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Unknown placeholder {{{0}}}")]
    UnknownPlaceholder(String),
    #[error("Placeholder opened at byte {0} is never closed")]
    Unterminated(usize),
    #[error("Submission file {0:?} already exists")]
    FileExists(PathBuf),
    #[error("Failed to write submission file {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Named values a template can refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    JobName,
    Nodes,
    Threads,
    SizeX,
    SizeY,
    Dimensionality,
    Steps,
    Time,
    Executable,
    Directory,
}

impl FromStr for Placeholder {
    type Err = TemplateError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Ok(match name {
            "job_name" => Self::JobName,
            "nodes" => Self::Nodes,
            "threads" => Self::Threads,
            "size_x" => Self::SizeX,
            "size_y" => Self::SizeY,
            "dimensionality" => Self::Dimensionality,
            "steps" => Self::Steps,
            "time" => Self::Time,
            "executable" => Self::Executable,
            "directory" => Self::Directory,
            unknown => return Err(TemplateError::UnknownPlaceholder(unknown.to_owned())),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// Everything needed to fill in a template for one configuration
#[derive(Debug, Clone)]
pub struct JobParameters<'a> {
    pub job_name: &'a str,
    pub configuration: &'a Configuration,
    pub dimensionality: u32,
    pub time: &'a str,
    pub executable: &'a Path,
    pub directory: &'a Path,
}

/// A pre-parsed submission file template.
///
/// Placeholders are written as `{name}`, literal braces as `{{` and `}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTemplate {
    segments: Vec<Segment>,
}

impl FromStr for JobTemplate {
    type Err = TemplateError;

    fn from_str(template: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.char_indices().peekable();

        while let Some((offset, current)) = chars.next() {
            match current {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, other)) => name.push(other),
                            None => return Err(TemplateError::Unterminated(offset)),
                        }
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name.trim().parse()?));
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }
}

impl JobTemplate {
    pub fn builtin() -> Result<Self, TemplateError> {
        DEFAULT_TEMPLATE.parse()
    }

    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(placeholder) => Some(*placeholder),
            Segment::Literal(_) => None,
        })
    }

    pub fn render(&self, parameters: &JobParameters) -> String {
        let mut output = String::new();
        let configuration = parameters.configuration;

        for segment in &self.segments {
            // writing into a String can't fail
            let _ = match segment {
                Segment::Literal(literal) => output.write_str(literal),
                Segment::Placeholder(placeholder) => match placeholder {
                    Placeholder::JobName => output.write_str(parameters.job_name),
                    Placeholder::Nodes => write!(output, "{}", configuration.nodes),
                    Placeholder::Threads => write!(output, "{}", configuration.threads),
                    Placeholder::SizeX => write!(output, "{}", configuration.size.x),
                    Placeholder::SizeY => write!(output, "{}", configuration.size.y),
                    Placeholder::Dimensionality => write!(output, "{}", parameters.dimensionality),
                    Placeholder::Steps => write!(output, "{}", configuration.steps),
                    Placeholder::Time => output.write_str(parameters.time),
                    Placeholder::Executable => {
                        write!(output, "{}", parameters.executable.display())
                    }
                    Placeholder::Directory => write!(output, "{}", parameters.directory.display()),
                },
            };
        }

        output
    }
}

/// Write a rendered submission file, never replacing an existing one
pub fn write_job_file(path: &Path, contents: &str) -> Result<(), TemplateError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| match source.kind() {
            io::ErrorKind::AlreadyExists => TemplateError::FileExists(path.to_path_buf()),
            _ => TemplateError::Write {
                path: path.to_path_buf(),
                source,
            },
        })?;

    file.write_all(contents.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|source| TemplateError::Write {
            path: path.to_path_buf(),
            source,
        })
}
