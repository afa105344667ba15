use crate::cli::args::OutputFormat;
use crate::reporting::model::ScanEvent;
use crate::reporting::{json, text};
use std::io::Write;
use tokio::sync::mpsc;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub findings: usize,
    pub errors: usize,
}

/// Writes findings to one stream and errors to another, in arrival order.
pub struct Reporter<O, E> {
    format: OutputFormat,
    out: O,
    err: E,
    summary: ReportSummary,
}

impl Reporter<std::io::Stdout, std::io::Stderr> {
    pub fn console(format: OutputFormat) -> Self {
        Self::new(format, std::io::stdout(), std::io::stderr())
    }
}

impl<O: Write, E: Write> Reporter<O, E> {
    pub fn new(format: OutputFormat, out: O, err: E) -> Self {
        Self {
            format,
            out,
            err,
            summary: ReportSummary::default(),
        }
    }

    pub fn add(&mut self, event: &ScanEvent) -> anyhow::Result<()> {
        match event {
            ScanEvent::Finding(finding) => {
                self.summary.findings += 1;
                let line = match self.format {
                    OutputFormat::Text => text::render_finding(finding),
                    OutputFormat::Json => json::render_finding(finding)?,
                };
                writeln!(self.out, "{}", line)?;
                self.out.flush()?;
            }
            ScanEvent::Error(error) => {
                self.summary.errors += 1;
                let line = match self.format {
                    OutputFormat::Text => text::render_error(error),
                    OutputFormat::Json => json::render_error(error)?,
                };
                writeln!(self.err, "{}", line)?;
            }
        }
        Ok(())
    }

    pub fn summary(&self) -> ReportSummary {
        self.summary
    }

    /// Consume events until every sender is gone.
    pub async fn drain(mut self, mut events: mpsc::Receiver<ScanEvent>) -> ReportSummary {
        while let Some(event) = events.recv().await {
            if let Err(e) = self.add(&event) {
                tracing::warn!("failed to write report line: {}", e);
            }
        }
        self.summary()
    }

    #[cfg(test)]
    fn into_writers(self) -> (O, E) {
        (self.out, self.err)
    }
}
