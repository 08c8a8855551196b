use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

/// Payload that has to follow a marker, e.g. `12.5 milliseconds`
static PAYLOAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([0-9.]+)\s+milliseconds\b").expect("payload pattern is valid")
});

/// The significant line kinds emitted by the simulation on its error stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogKind {
    BorderWait,
    GhostWait,
    TotalTime,
}

impl LogKind {
    /// All kinds in the order they are tried against a line
    pub const ALL: [LogKind; 3] = [Self::BorderWait, Self::GhostWait, Self::TotalTime];

    /// textual marker the payload follows
    pub fn marker(self) -> &'static str {
        match self {
            Self::BorderWait => "DEBUG: Waited for borders for ",
            Self::GhostWait => "DEBUG: Waited for ghosts for ",
            Self::TotalTime => "TIME: Simulation took",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BorderWait => "border-wait",
            Self::GhostWait => "ghost-wait",
            Self::TotalTime => "total-time",
        })
    }
}

/// A single duration reported by the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRecord {
    pub kind: LogKind,
    pub millis: f64,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} line has no valid millisecond payload: {line:?}")]
pub struct MalformedLogLineError {
    pub kind: LogKind,
    pub line: String,
}

/// Parse one line of a run's error stream.
///
/// Returns `Ok(None)` for lines carrying none of the markers, `Ok(Some(_))` for a
/// marker followed by `<float> milliseconds` and an error when a marker is present
/// but its payload can't be read.
pub fn parse_line(line: &str) -> Result<Option<LogRecord>, MalformedLogLineError> {
    for kind in LogKind::ALL {
        let Some(rest) = line.strip_prefix(kind.marker()) else {
            continue;
        };

        let millis = PAYLOAD
            .captures(rest)
            .and_then(|captures| captures.get(1))
            .and_then(|value| value.as_str().parse::<f64>().ok())
            .filter(|value| value.is_finite());

        return match millis {
            Some(millis) => Ok(Some(LogRecord { kind, millis })),
            None => Err(MalformedLogLineError {
                kind,
                line: line.trim_end().to_owned(),
            }),
        };
    }

    Ok(None)
}
