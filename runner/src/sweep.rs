use itertools::iproduct;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SweepError {
    #[error("Dimension {0} has no values")]
    EmptyDimension(&'static str),
    #[error("Dimension {dimension} contains the non-positive value {value}")]
    NonPositive {
        dimension: &'static str,
        value: String,
    },
    #[error("Dimension {dimension} contains {value} more than once")]
    Duplicate {
        dimension: &'static str,
        value: String,
    },
    #[error("Step count must be positive")]
    NoSteps,
}

/// Values that can span one axis of the sweep
pub trait AxisValue: Copy + PartialEq + fmt::Display {
    fn is_positive(&self) -> bool;
}

impl AxisValue for u32 {
    fn is_positive(&self) -> bool {
        *self > 0
    }
}

/// Problem size of the simulated world, `x` columns times `y` rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Size {
    pub x: u32,
    pub y: u32,
}

impl Size {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn square(edge: u32) -> Self {
        Self { x: edge, y: edge }
    }

    pub fn is_square(&self) -> bool {
        self.x == self.y
    }
}

impl AxisValue for Size {
    fn is_positive(&self) -> bool {
        self.x > 0 && self.y > 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

/// Ordered, validated list of the legal values of one axis
#[derive(Debug, Clone, PartialEq)]
pub struct SweepDimension<T> {
    values: Vec<T>,
}

impl<T: AxisValue> SweepDimension<T> {
    pub fn new(name: &'static str, values: Vec<T>) -> Result<Self, SweepError> {
        if values.is_empty() {
            return Err(SweepError::EmptyDimension(name));
        }

        for (index, value) in values.iter().enumerate() {
            if !value.is_positive() {
                return Err(SweepError::NonPositive {
                    dimension: name,
                    value: value.to_string(),
                });
            }

            if values[..index].contains(value) {
                return Err(SweepError::Duplicate {
                    dimension: name,
                    value: value.to_string(),
                });
            }
        }

        Ok(Self { values })
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

}

/// The part of a configuration that is encoded in its directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId {
    pub nodes: u32,
    pub size: Size,
    pub threads: u32,
}

/// One concrete experiment of the sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Configuration {
    pub nodes: u32,
    pub size: Size,
    pub threads: u32,
    pub steps: u64,
}

impl Configuration {
    pub fn id(&self) -> RunId {
        RunId {
            nodes: self.nodes,
            size: self.size,
            threads: self.threads,
        }
    }
}

/// Full experiment matrix: nodes x sizes x threads at a fixed step count
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    pub nodes: SweepDimension<u32>,
    pub sizes: SweepDimension<Size>,
    pub threads: SweepDimension<u32>,
    pub steps: u64,
}

impl Sweep {
    pub fn new(
        nodes: Vec<u32>,
        sizes: Vec<Size>,
        threads: Vec<u32>,
        steps: u64,
    ) -> Result<Self, SweepError> {
        if steps == 0 {
            return Err(SweepError::NoSteps);
        }

        Ok(Self {
            nodes: SweepDimension::new("nodes", nodes)?,
            sizes: SweepDimension::new("sizes", sizes)?,
            threads: SweepDimension::new("threads", threads)?,
            steps,
        })
    }

    /// number of configurations in the matrix
    pub fn len(&self) -> usize {
        self.nodes.values().len() * self.sizes.values().len() * self.threads.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lazily enumerate the cartesian product, nodes varying slowest and threads fastest
    pub fn configurations(&self) -> impl Iterator<Item = Configuration> + '_ {
        let steps = self.steps;

        iproduct!(
            self.nodes.values().iter(),
            self.sizes.values().iter(),
            self.threads.values().iter()
        )
        .map(move |(&nodes, &size, &threads)| Configuration {
            nodes,
            size,
            threads,
            steps,
        })
    }
}
