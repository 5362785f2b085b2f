//! Excel workbook with one sheet per pivot.

use std::io::Write;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use super::types::{ReportEmitter, ReportTarget};
use crate::aggregate::{AggregatedReport, PivotTable};
use crate::config::OutputFormat;
use crate::error_handling::EmissionError;

pub const BY_URL_SHEET: &str = "By URL";
pub const BY_TECHNOLOGY_SHEET: &str = "By Technology";

#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxEmitter;

impl XlsxEmitter {
    /// Builds the workbook in memory.
    pub fn build(report: &AggregatedReport) -> Result<Workbook, EmissionError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let sheet = workbook.add_worksheet();
        sheet.set_name(BY_URL_SHEET)?;
        write_table(sheet, &report.by_url, &header_format)?;

        let sheet = workbook.add_worksheet();
        sheet.set_name(BY_TECHNOLOGY_SHEET)?;
        write_table(sheet, &report.by_technology, &header_format)?;

        Ok(workbook)
    }
}

fn row_index(index: usize) -> Result<u32, XlsxError> {
    u32::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

fn column_index(index: usize) -> Result<u16, XlsxError> {
    u16::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

fn write_table(
    sheet: &mut Worksheet,
    table: &dyn PivotTable,
    header_format: &Format,
) -> Result<(), XlsxError> {
    let header = table.header();
    for (col, title) in header.iter().enumerate() {
        sheet.write_string_with_format(0, column_index(col)?, title, header_format)?;
    }

    let records = table.records();
    for (row, record) in records.iter().enumerate() {
        let row = row_index(row + 1)?;
        for (col, cell) in record.iter().enumerate() {
            // Blank cells stay unwritten so the sheet has no empty strings
            if !cell.is_empty() {
                sheet.write_string(row, column_index(col)?, cell)?;
            }
        }
    }

    let last_col = column_index(header.len().saturating_sub(1))?;
    sheet.autofilter(0, 0, row_index(records.len())?, last_col)?;
    sheet.set_freeze_panes(1, 0)?;
    sheet.autofit();
    Ok(())
}

impl ReportEmitter for XlsxEmitter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Xlsx
    }

    fn emit(&self, report: &AggregatedReport, target: &ReportTarget) -> Result<(), EmissionError> {
        let mut workbook = Self::build(report)?;
        match target {
            ReportTarget::File(path) => workbook.save(path)?,
            ReportTarget::Stdout => {
                let bytes = workbook.save_to_buffer()?;
                let mut out = target.open()?;
                out.write_all(&bytes)?;
                out.flush()?;
            }
        }
        Ok(())
    }
}
