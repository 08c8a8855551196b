use crate::{aggregate::ConfigurationSummary, AnalysisError};
use std::io::{self, Write};
use sweep_runner::sweep::Size;

/// Size column, the edge for square worlds and `<x>x<y>` otherwise
pub fn size_label(size: &Size) -> String {
    if size.is_square() {
        size.x.to_string()
    } else {
        size.to_string()
    }
}

/// `nodes size threads time border ghost overhead`, tab separated, floats at 3 decimals
pub fn format_row(summary: &ConfigurationSummary) -> String {
    format!(
        "{}\t{}\t{}\t{:.3}\t{:.3}\t{:.3}\t{:.3}",
        summary.id.nodes,
        size_label(&summary.id.size),
        summary.id.threads,
        summary.time,
        summary.border,
        summary.ghost,
        summary.overhead
    )
}

/// Writes report rows, one line per configuration
pub struct ReportWriter<W: Write> {
    output: W,
    rows: usize,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(output: W) -> Self {
        Self { output, rows: 0 }
    }

    pub fn write(&mut self, summary: &ConfigurationSummary) -> io::Result<()> {
        writeln!(self.output, "{}", format_row(summary))?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.output.flush()?;
        Ok(self.output)
    }
}

/// Write all summaries in order and flush, returning the number of rows
pub fn write_report<'a, W: Write>(
    output: W,
    summaries: impl IntoIterator<Item = &'a ConfigurationSummary>,
) -> Result<usize, AnalysisError> {
    let mut report = ReportWriter::new(output);

    for summary in summaries {
        report.write(summary)?;
    }

    let rows = report.rows();
    report.finish()?;

    Ok(rows)
}
