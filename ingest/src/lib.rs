pub mod record;
pub mod scan;

#[cfg(test)]
mod record_test;

pub use record::{parse_line, LogKind, LogRecord, MalformedLogLineError};
pub use scan::{scan_file, scan_reader, LogScan};
