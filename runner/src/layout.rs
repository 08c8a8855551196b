use crate::sweep::{RunId, Size};
use std::{
    collections::HashSet,
    fs, io,
    path::{Component, Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

/// artifact directory written by the simulation
pub const IMAGES_DIR: &str = "images";
/// marker directory holding a run's logs
pub const OUTPUT_DIR: &str = "output";

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("{0:?} already exists, refusing to merge into a previous sweep")]
    ConfigurationExists(PathBuf),
    #[error("Path {path:?} does not follow n-<nodes>/s-<x>-<y>/t-<threads>: {reason}")]
    MalformedPath { path: PathBuf, reason: &'static str },
    #[error("Failed to create {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Relative directory of a configuration, `n-<nodes>/s-<x>-<y>/t-<threads>`
pub fn relative_dir(id: &RunId) -> PathBuf {
    let mut path = PathBuf::from(format!("n-{}", id.nodes));
    path.push(format!("s-{}-{}", id.size.x, id.size.y));
    path.push(format!("t-{}", id.threads));
    path
}

/// strictly positive decimal without sign or whitespace
fn parse_count(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    value.parse().ok().filter(|count| *count > 0)
}

fn malformed(path: &Path, reason: &'static str) -> LayoutError {
    LayoutError::MalformedPath {
        path: path.to_path_buf(),
        reason,
    }
}

/// Recover the configuration from the last three segments of a configuration directory
pub fn decode(path: &Path) -> Result<RunId, LayoutError> {
    let mut segments = path
        .components()
        .rev()
        .filter(|component| !matches!(component, Component::CurDir));

    let mut next_segment = |reason: &'static str| match segments.next() {
        Some(Component::Normal(segment)) => segment.to_str().ok_or_else(|| malformed(path, reason)),
        _ => Err(malformed(path, reason)),
    };

    let threads = next_segment("missing thread segment")?;
    let size = next_segment("missing size segment")?;
    let nodes = next_segment("missing node segment")?;

    let threads = threads
        .strip_prefix("t-")
        .and_then(parse_count)
        .ok_or_else(|| malformed(path, "thread segment must be t-<threads>"))?;
    let size = size
        .strip_prefix("s-")
        .and_then(|size| size.split_once('-'))
        .and_then(|(x, y)| Some(Size::new(parse_count(x)?, parse_count(y)?)))
        .ok_or_else(|| malformed(path, "size segment must be s-<x>-<y>"))?;
    let nodes = nodes
        .strip_prefix("n-")
        .and_then(parse_count)
        .ok_or_else(|| malformed(path, "node segment must be n-<nodes>"))?;

    Ok(RunId {
        nodes,
        size,
        threads,
    })
}

/// Decode a discovered `output` directory via its parent configuration directory
pub fn decode_run_dir(path: &Path) -> Result<RunId, LayoutError> {
    if path.file_name().and_then(|name| name.to_str()) != Some(OUTPUT_DIR) {
        return Err(malformed(path, "run directories must be named output"));
    }

    match path.parent() {
        Some(parent) => decode(parent),
        None => Err(malformed(path, "run directory has no parent")),
    }
}

/// Creates configuration directories below a sweep root.
/// Every `n-*`, `s-*` and `t-*` segment must be new, only segments this builder created
/// itself are shared between configurations.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    root: PathBuf,
    created: HashSet<PathBuf>,
}

impl TreeBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            created: HashSet::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, id: &RunId) -> PathBuf {
        self.root.join(relative_dir(id))
    }

    /// Segments below the root from `n-<nodes>` down to the configuration directory
    fn segments(&self, id: &RunId) -> Vec<PathBuf> {
        let mut segment = self.root.clone();
        relative_dir(id)
            .components()
            .map(|component| {
                segment.push(component);
                segment.clone()
            })
            .collect()
    }

    /// fails if any segment of the configuration directory was left by a previous sweep
    pub fn check_free(&self, id: &RunId) -> Result<PathBuf, LayoutError> {
        for segment in self.segments(id) {
            if self.created.contains(&segment) {
                continue;
            }

            match fs::symlink_metadata(&segment) {
                Ok(_) => return Err(LayoutError::ConfigurationExists(segment)),
                // nothing below a missing segment can exist
                Err(error) if error.kind() == io::ErrorKind::NotFound => break,
                Err(source) => return Err(LayoutError::Io { path: segment, source }),
            }
        }

        Ok(self.path(id))
    }

    /// Create the configuration directory with its `images` and `output` directories.
    /// Parent segments are reused only if this builder created them.
    pub fn create(&mut self, id: &RunId) -> Result<PathBuf, LayoutError> {
        let path = self.path(id);

        fs::create_dir_all(&self.root).map_err(|source| LayoutError::Io {
            path: self.root.clone(),
            source,
        })?;

        for segment in self.segments(id) {
            let leaf = segment == path;
            if !leaf && self.created.contains(&segment) {
                continue;
            }

            match fs::create_dir(&segment) {
                Ok(()) => {}
                Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
                    return Err(LayoutError::ConfigurationExists(segment))
                }
                Err(source) => return Err(LayoutError::Io { path: segment, source }),
            }

            if !leaf {
                self.created.insert(segment);
            }
        }

        for artifact in [IMAGES_DIR, OUTPUT_DIR] {
            let artifact = path.join(artifact);
            fs::create_dir(&artifact).map_err(|source| LayoutError::Io {
                path: artifact,
                source,
            })?;
        }

        debug!(path = ?path, "Created configuration directory");

        Ok(path)
    }
}
