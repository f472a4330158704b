//! Consistency checks that do not fail a load.

use std::collections::HashSet;

use crate::{
    fixture::{Fixture, Record},
    vocabulary::{FilterCode, StatusCode},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Lint {
    #[error("export type {pk} points at exporter {exporter}")]
    ExporterNameMismatch { pk: String, exporter: String },
    #[error("status {0} is not defined")]
    MissingStatus(StatusCode),
    #[error("export filter {0} is not defined")]
    MissingFilter(FilterCode),
}

pub fn lint(fixtures: &[Fixture]) -> Vec<Lint> {
    let mut lints = Vec::new();
    let mut statuses = HashSet::new();
    let mut filters = HashSet::new();
    for record in fixtures.iter().flat_map(|f| &f.records) {
        match record {
            Record::ExportType(row) => {
                if row.exporter_name() != row.pk {
                    lints.push(Lint::ExporterNameMismatch {
                        pk: row.pk.clone(),
                        exporter: row.exporter_name().to_owned(),
                    });
                }
            }
            Record::ExportFilter(row) => {
                filters.insert(row.pk.as_str());
            }
            Record::Status(row) => {
                statuses.insert(row.pk.as_str());
            }
        }
    }
    lints.extend(
        StatusCode::ALL
            .into_iter()
            .filter(|code| !statuses.contains(code.as_str()))
            .map(Lint::MissingStatus),
    );
    lints.extend(
        FilterCode::ALL
            .into_iter()
            .filter(|code| !filters.contains(code.as_str()))
            .map(Lint::MissingFilter),
    );
    lints
}
