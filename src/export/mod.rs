//! Report emission.
//!
//! Three formats share the [`ReportEmitter`] contract:
//! - `xlsx`: both pivots, one worksheet each
//! - `csv`: one pivot, chosen by [`CsvPivot`]
//! - `json`: the technology list and both pivots

mod csv;
mod json;
mod types;
mod xlsx;

use std::path::Path;

use log::info;

use crate::aggregate::AggregatedReport;
use crate::config::{CsvPivot, OutputFormat};
use crate::error_handling::EmissionError;

pub use csv::CsvEmitter;
pub use json::JsonEmitter;
pub use types::{ReportEmitter, ReportTarget};
pub use xlsx::{XlsxEmitter, BY_TECHNOLOGY_SHEET, BY_URL_SHEET};

pub fn emitter_for(format: OutputFormat, csv_pivot: CsvPivot) -> Box<dyn ReportEmitter> {
    match format {
        OutputFormat::Xlsx => Box::new(XlsxEmitter),
        OutputFormat::Csv => Box::new(CsvEmitter::new(csv_pivot)),
        OutputFormat::Json => Box::new(JsonEmitter),
    }
}

/// Writes `report` to `output` and returns where it went.
///
/// The format extension is appended to `output` when missing; `-` writes to
/// stdout.
///
/// # Errors
///
/// Returns an `EmissionError` if the target cannot be created or written.
pub fn emit_report(
    report: &AggregatedReport,
    output: &Path,
    format: OutputFormat,
    csv_pivot: CsvPivot,
) -> Result<ReportTarget, EmissionError> {
    let target = ReportTarget::resolve(output, format);
    let emitter = emitter_for(format, csv_pivot);
    emitter.emit(report, &target)?;
    info!("Wrote {} report to {}", emitter.format().extension(), target);
    Ok(target)
}
