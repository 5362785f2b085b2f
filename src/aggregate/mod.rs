//! Aggregation of detection outcomes into pivot tables.
//!
//! `aggregate` is a pure function of the outcome sequence: the same outcomes
//! in the same order always produce identical tables.

mod pivot;
mod render;

use log::info;
use serde::Serialize;

use crate::detection::DetectionOutcome;

pub use pivot::{
    PivotByTechnology, PivotByUrl, PivotTable, TechnologyRow, TechnologyUniverse, UrlRow,
};
pub use render::render_attributes;

/// The three derived views handed to report emitters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregatedReport {
    pub universe: TechnologyUniverse,
    pub by_technology: PivotByTechnology,
    pub by_url: PivotByUrl,
}

impl AggregatedReport {
    pub fn from_parts(
        universe: TechnologyUniverse,
        by_technology: PivotByTechnology,
        by_url: PivotByUrl,
    ) -> Self {
        Self {
            universe,
            by_technology,
            by_url,
        }
    }

    pub fn into_parts(self) -> (TechnologyUniverse, PivotByTechnology, PivotByUrl) {
        (self.universe, self.by_technology, self.by_url)
    }
}

/// Builds the technology universe and both pivots from `outcomes`.
///
/// Failures get a `PivotByUrl` row with an empty `Last_Url` and empty cells,
/// and contribute no cell to `PivotByTechnology`. Duplicate URLs stay
/// separate rows.
pub fn aggregate(outcomes: &[DetectionOutcome]) -> AggregatedReport {
    let universe = TechnologyUniverse::from_outcomes(outcomes);

    let url_rows: Vec<UrlRow> = outcomes
        .iter()
        .map(|outcome| UrlRow {
            url: outcome.url().to_string(),
            last_url: outcome.final_url().unwrap_or_default().to_string(),
            cells: universe
                .iter()
                .map(|technology| {
                    outcome
                        .technologies()
                        .and_then(|found| found.get(technology))
                        .map(render_attributes)
                        .unwrap_or_default()
                })
                .collect(),
        })
        .collect();

    let technology_rows = universe
        .iter()
        .enumerate()
        .map(|(column, technology)| TechnologyRow {
            technology: technology.clone(),
            cells: url_rows.iter().map(|row| row.cells[column].clone()).collect(),
        })
        .collect();

    AggregatedReport {
        by_technology: PivotByTechnology {
            urls: url_rows.iter().map(|row| row.url.clone()).collect(),
            rows: technology_rows,
        },
        by_url: PivotByUrl {
            technologies: universe.names().to_vec(),
            rows: url_rows,
        },
        universe,
    }
}

/// Logs the technology universe, one line.
pub fn log_universe(universe: &TechnologyUniverse) {
    if universe.is_empty() {
        info!("No technologies seen");
    } else {
        info!(
            "All technologies seen ({}): {}",
            universe.len(),
            universe.names().join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{NormalizedDetection, TechnologyAttributes};
    use std::collections::BTreeMap;

    fn success(url: &str, final_url: &str, techs: &[(&str, Option<&str>)]) -> DetectionOutcome {
        let technologies: BTreeMap<String, TechnologyAttributes> = techs
            .iter()
            .map(|(name, version)| {
                (
                    name.to_string(),
                    TechnologyAttributes {
                        version: version.map(str::to_string),
                        ..Default::default()
                    },
                )
            })
            .collect();
        DetectionOutcome::success(
            url,
            NormalizedDetection {
                technologies,
                final_url: final_url.to_string(),
                visited: Vec::new(),
            },
        )
    }

    #[test]
    fn test_two_url_example() {
        let outcomes = vec![
            success("a.com", "https://a.com/", &[("Nginx", Some("1.18"))]),
            DetectionOutcome::failure("b.com", "timeout"),
        ];

        let report = aggregate(&outcomes);
        assert_eq!(report.universe.names(), ["Nginx"]);

        assert_eq!(report.by_url.header(), ["Urls", "Last_Url", "Nginx"]);
        assert_eq!(
            report.by_url.records(),
            vec![
                vec!["a.com", "https://a.com/", "1.18"],
                vec!["b.com", "", ""],
            ]
        );

        assert_eq!(report.by_technology.header(), ["Technology", "a.com", "b.com"]);
        assert_eq!(
            report.by_technology.records(),
            vec![vec!["Nginx", "1.18", ""]]
        );
    }

    #[test]
    fn test_zero_outcomes() {
        let report = aggregate(&[]);
        assert!(report.universe.is_empty());
        assert!(report.by_url.rows().is_empty());
        assert!(report.by_technology.rows().is_empty());
        assert_eq!(report.by_url.header(), ["Urls", "Last_Url"]);
        assert_eq!(report.by_technology.header(), ["Technology"]);
    }

    #[test]
    fn test_duplicate_urls_stay_separate() {
        let outcomes = vec![
            success("x.com", "https://x.com/", &[("PHP", Some("8.1"))]),
            success("x.com", "https://x.com/", &[("PHP", Some("8.2"))]),
        ];
        let report = aggregate(&outcomes);
        assert_eq!(report.by_url.rows().len(), 2);
        assert_eq!(report.by_technology.urls(), ["x.com", "x.com"]);
        assert_eq!(report.by_technology.row("PHP").unwrap().cells, ["8.1", "8.2"]);
    }

    #[test]
    fn test_universe_sorted_and_deduplicated() {
        let outcomes = vec![
            success("a.com", "a", &[("jQuery", None), ("Nginx", None)]),
            success("b.com", "b", &[("Nginx", None), ("Apache", None)]),
        ];
        let report = aggregate(&outcomes);
        assert_eq!(report.universe.names(), ["Apache", "Nginx", "jQuery"]);
        assert!(report.universe.contains("jQuery"));
        assert!(!report.universe.contains("React"));
        assert_eq!(report.by_url.cell(0, "Apache"), Some(""));
        assert_eq!(report.by_url.cell(0, "jQuery"), Some("detected"));
        assert_eq!(report.by_url.cell(5, "jQuery"), None);
    }

    #[test]
    fn test_failure_only_run() {
        let outcomes = vec![DetectionOutcome::failure("down.com", "unreachable")];
        let report = aggregate(&outcomes);
        assert!(report.universe.is_empty());
        assert_eq!(report.by_url.records(), vec![vec!["down.com", ""]]);
        assert!(report.by_technology.records().is_empty());
        assert_eq!(report.by_technology.header(), ["Technology", "down.com"]);
    }

    #[test]
    fn test_technology_named_like_fixed_column() {
        let outcomes = vec![success("a.com", "https://a.com/", &[("Urls", Some("9"))])];
        let report = aggregate(&outcomes);

        assert_eq!(report.by_url.header(), ["Urls", "Last_Url", "Urls (2)"]);
        assert_eq!(
            report.by_url.records(),
            vec![vec!["a.com", "https://a.com/", "9"]]
        );
        assert_eq!(report.by_url.cell(0, "Urls"), Some("9"));
        assert_eq!(report.by_technology.records(), vec![vec!["Urls", "9"]]);
    }

    #[test]
    fn test_into_parts() {
        let report = aggregate(&[success("a.com", "a", &[("Nginx", None)])]);
        let (universe, by_technology, by_url) = report.clone().into_parts();
        assert_eq!(universe, report.universe);
        assert_eq!(by_technology, report.by_technology);
        assert_eq!(by_url, report.by_url);
        assert_eq!(
            AggregatedReport::from_parts(universe, by_technology, by_url),
            report
        );
    }
}
