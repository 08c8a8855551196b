use sweep_ingest::{LogKind, LogRecord};
use sweep_runner::sweep::RunId;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateError {
    #[error("no {0} records")]
    EmptyAggregate(LogKind),
    #[error("mean total time is zero, overhead is undefined")]
    ZeroTotalTime,
}

/// Running arithmetic mean
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mean {
    mean: f64,
    count: usize,
}

impl Mean {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        // incremental form keeps the mean of identical values exact
        self.mean += (value - self.mean) / self.count as f64;
    }

    pub fn get(&self, kind: LogKind) -> Result<f64, AggregateError> {
        match self.count {
            0 => Err(AggregateError::EmptyAggregate(kind)),
            _ => Ok(self.mean),
        }
    }
}

/// Reduced statistics of one configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfigurationSummary {
    pub id: RunId,
    /// mean total run time in seconds
    pub time: f64,
    /// mean border wait in milliseconds
    pub border: f64,
    /// mean ghost wait in milliseconds
    pub ghost: f64,
    /// `(border + ghost) * 100 / time`
    pub overhead: f64,
}

/// Per-kind means over all records of a run directory
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aggregate {
    border: Mean,
    ghost: Mean,
    total: Mean,
}

impl Aggregate {
    pub fn push(&mut self, record: LogRecord) {
        match record.kind {
            LogKind::BorderWait => self.border.push(record.millis),
            LogKind::GhostWait => self.ghost.push(record.millis),
            LogKind::TotalTime => self.total.push(record.millis),
        }
    }

    pub fn summarize(&self, id: RunId) -> Result<ConfigurationSummary, AggregateError> {
        let border = self.border.get(LogKind::BorderWait)?;
        let ghost = self.ghost.get(LogKind::GhostWait)?;
        let time = self.total.get(LogKind::TotalTime)? / 1000.0;

        if time == 0.0 {
            return Err(AggregateError::ZeroTotalTime);
        }

        Ok(ConfigurationSummary {
            id,
            time,
            border,
            ghost,
            overhead: (border + ghost) * 100.0 / time,
        })
    }
}

impl Extend<LogRecord> for Aggregate {
    fn extend<T: IntoIterator<Item = LogRecord>>(&mut self, records: T) {
        records.into_iter().for_each(|record| self.push(record));
    }
}
