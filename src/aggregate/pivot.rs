//! Pivot table structures.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::config::{LAST_URL_COLUMN, TECHNOLOGY_COLUMN, URLS_COLUMN};
use crate::detection::DetectionOutcome;

/// A header row plus data rows of text cells, as handed to report writers.
pub trait PivotTable {
    /// Column headers, always present even when there are no rows.
    fn header(&self) -> Vec<String>;

    /// Data rows; every row has exactly `header().len()` cells.
    fn records(&self) -> Vec<Vec<String>>;
}

/// Every technology name seen in a run, deduplicated and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TechnologyUniverse(Vec<String>);

impl TechnologyUniverse {
    /// Collects the technology names of all successful outcomes.
    pub fn from_outcomes(outcomes: &[DetectionOutcome]) -> Self {
        let names: BTreeSet<&str> = outcomes
            .iter()
            .filter_map(DetectionOutcome::technologies)
            .flat_map(|technologies| technologies.keys().map(String::as_str))
            .collect();
        Self(names.into_iter().map(str::to_string).collect())
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

/// Header row: the `fixed` columns followed by one label per name.
///
/// A name equal to a fixed column is labelled `name (2)`, or the first
/// higher suffix no other column uses. Other names, duplicates included,
/// are kept as they are.
fn column_labels(fixed: &[&str], names: &[String]) -> Vec<String> {
    let mut taken: HashSet<String> = fixed
        .iter()
        .map(|f| f.to_string())
        .chain(names.iter().cloned())
        .collect();

    let mut labels: Vec<String> = fixed.iter().map(|f| f.to_string()).collect();
    for name in names {
        if !fixed.contains(&name.as_str()) {
            labels.push(name.clone());
            continue;
        }
        let label = (2..)
            .map(|n| format!("{name} ({n})"))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or_else(|| name.clone());
        taken.insert(label.clone());
        labels.push(label);
    }
    labels
}

/// One row of [`PivotByUrl`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlRow {
    pub url: String,
    /// Final URL after redirects; empty for failures
    pub last_url: String,
    /// One cell per technology, in universe order
    pub cells: Vec<String>,
}

/// URL rows by technology columns, plus `Urls` and `Last_Url`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PivotByUrl {
    pub(crate) technologies: Vec<String>,
    pub(crate) rows: Vec<UrlRow>,
}

impl PivotByUrl {
    pub fn technologies(&self) -> &[String] {
        &self.technologies
    }

    pub fn rows(&self) -> &[UrlRow] {
        &self.rows
    }

    /// Cell for (`row`, `technology`), `None` when either is out of range.
    pub fn cell(&self, row: usize, technology: &str) -> Option<&str> {
        let column = self.technologies.iter().position(|t| t == technology)?;
        self.rows.get(row).map(|r| r.cells[column].as_str())
    }
}

impl PivotTable for PivotByUrl {
    fn header(&self) -> Vec<String> {
        column_labels(&[URLS_COLUMN, LAST_URL_COLUMN], &self.technologies)
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                [row.url.clone(), row.last_url.clone()]
                    .into_iter()
                    .chain(row.cells.iter().cloned())
                    .collect()
            })
            .collect()
    }
}

/// One row of [`PivotByTechnology`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnologyRow {
    pub technology: String,
    /// One cell per URL, in outcome order
    pub cells: Vec<String>,
}

/// Technology rows by URL columns; the transpose of [`PivotByUrl`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PivotByTechnology {
    pub(crate) urls: Vec<String>,
    pub(crate) rows: Vec<TechnologyRow>,
}

impl PivotByTechnology {
    /// Column URLs in outcome order; duplicates are kept.
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn rows(&self) -> &[TechnologyRow] {
        &self.rows
    }

    /// Row for `technology`.
    pub fn row(&self, technology: &str) -> Option<&TechnologyRow> {
        self.rows.iter().find(|r| r.technology == technology)
    }
}

impl PivotTable for PivotByTechnology {
    fn header(&self) -> Vec<String> {
        column_labels(&[TECHNOLOGY_COLUMN], &self.urls)
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                std::iter::once(row.technology.clone())
                    .chain(row.cells.iter().cloned())
                    .collect()
            })
            .collect()
    }
}
