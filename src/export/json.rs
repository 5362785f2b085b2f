//! JSON report: technology list plus both pivots.
//!
//! ```json
//! {
//!   "technologies": ["Nginx"],
//!   "by_url": [{"Urls": "a.com", "Last_Url": "https://a.com/", "Nginx": "1.18"}],
//!   "by_technology": [{"Technology": "Nginx", "cells": [{"url": "a.com", "value": "1.18"}]}]
//! }
//! ```
//!
//! `by_technology` lists its cells instead of keying them by URL so duplicate
//! input URLs survive.

use std::io::Write;

use serde_json::{json, Map, Value};

use super::types::{ReportEmitter, ReportTarget};
use crate::aggregate::{AggregatedReport, PivotTable};
use crate::config::{OutputFormat, TECHNOLOGY_COLUMN};
use crate::error_handling::EmissionError;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEmitter;

impl JsonEmitter {
    /// Builds the JSON document for `report`.
    pub fn to_value(report: &AggregatedReport) -> Value {
        let header = report.by_url.header();
        let by_url: Vec<Value> = report
            .by_url
            .records()
            .into_iter()
            .map(|record| {
                let row: Map<String, Value> = header
                    .iter()
                    .cloned()
                    .zip(record.into_iter().map(Value::String))
                    .collect();
                Value::Object(row)
            })
            .collect();

        let urls = report.by_technology.urls();
        let by_technology: Vec<Value> = report
            .by_technology
            .rows()
            .iter()
            .map(|row| {
                let cells: Vec<Value> = urls
                    .iter()
                    .zip(&row.cells)
                    .map(|(url, value)| json!({"url": url, "value": value}))
                    .collect();
                let mut entry = Map::new();
                entry.insert(
                    TECHNOLOGY_COLUMN.to_string(),
                    Value::String(row.technology.clone()),
                );
                entry.insert("cells".to_string(), Value::Array(cells));
                Value::Object(entry)
            })
            .collect();

        json!({
            "technologies": report.universe,
            "by_url": by_url,
            "by_technology": by_technology,
        })
    }

    pub fn write_to<W: Write>(report: &AggregatedReport, mut out: W) -> Result<(), EmissionError> {
        serde_json::to_writer_pretty(&mut out, &Self::to_value(report))?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}

impl ReportEmitter for JsonEmitter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn emit(&self, report: &AggregatedReport, target: &ReportTarget) -> Result<(), EmissionError> {
        Self::write_to(report, target.open()?)
    }
}
