use crate::record::{parse_line, LogRecord};
use std::{
    fs::File,
    io::{self, BufRead, BufReader, Read},
    path::Path,
};
use tracing::{debug, trace};

/// Everything extracted from a single log stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogScan {
    pub records: Vec<LogRecord>,
    /// lines that carried a marker but no readable payload
    pub malformed: usize,
    pub lines: usize,
}

/// Scan a log stream line by line.
///
/// Invalid UTF-8 is replaced instead of failing the stream, the simulation does not
/// guarantee clean output when a rank is killed mid-write.
pub fn scan_reader<R: Read>(reader: R) -> io::Result<LogScan> {
    let mut reader = BufReader::new(reader);
    let mut buffer = Vec::new();
    let mut scan = LogScan::default();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        scan.lines += 1;

        let line = String::from_utf8_lossy(&buffer);
        let line = line.trim_end_matches(&['\n', '\r'][..]);

        match parse_line(line) {
            Ok(Some(record)) => scan.records.push(record),
            Ok(None) => {}
            Err(error) => {
                trace!(line = scan.lines, "Skipping line: {error}");
                scan.malformed += 1;
            }
        }
    }

    Ok(scan)
}

pub fn scan_file(path: &Path) -> io::Result<LogScan> {
    let scan = scan_reader(File::open(path)?)?;

    debug!(
        path = ?path,
        records = scan.records.len(),
        malformed = scan.malformed,
        "Scanned log file"
    );

    Ok(scan)
}
