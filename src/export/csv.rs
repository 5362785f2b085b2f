//! CSV report: one pivot, header row first.

use std::io::Write;

use csv::Writer;

use super::types::{ReportEmitter, ReportTarget};
use crate::aggregate::{AggregatedReport, PivotTable};
use crate::config::{CsvPivot, OutputFormat};
use crate::error_handling::EmissionError;

/// Writes the pivot selected by `pivot`.
#[derive(Debug, Clone, Copy)]
pub struct CsvEmitter {
    pub pivot: CsvPivot,
}

impl CsvEmitter {
    pub fn new(pivot: CsvPivot) -> Self {
        Self { pivot }
    }

    /// Writes the selected pivot to any writer.
    pub fn write_to<W: Write>(
        &self,
        report: &AggregatedReport,
        out: W,
    ) -> Result<(), EmissionError> {
        let table: &dyn PivotTable = match self.pivot {
            CsvPivot::Url => &report.by_url,
            CsvPivot::Technology => &report.by_technology,
        };

        let mut writer = Writer::from_writer(out);
        writer.write_record(table.header().iter().map(|h| single_line(h)))?;
        for record in table.records() {
            writer.write_record(record.iter().map(|cell| single_line(cell)))?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Folds multi-line cells onto one line so every record is one line.
fn single_line(cell: &str) -> String {
    cell.lines().collect::<Vec<_>>().join(" ")
}

impl ReportEmitter for CsvEmitter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn emit(&self, report: &AggregatedReport, target: &ReportTarget) -> Result<(), EmissionError> {
        self.write_to(report, target.open()?)
    }
}
