//! Fixture parsing
//!
//! A fixture is a JSON array of `{"fields": {...}, "model": "...", "pk": "..."}`
//! entries. The outer `model` is the kind discriminator and selects the
//! destination table.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use serde_json::Value;
use tracing::debug;

use crate::{Error, ErrorContext, ErrorDetail};

mod types;
mod validate;

pub use types::{ExportFilter, ExportType, JobStatus, NO_RECORD_MODEL, Record};

/// Path the bundled fixture is reported under in errors.
pub const BUNDLED_PATH: &str = "fixtures/export.json";

const BUNDLED: &str = include_str!("../../fixtures/export.json");

/// The kinds of record a fixture may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    ExportType,
    ExportFilter,
    Status,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::ExportType, Kind::ExportFilter, Kind::Status];

    /// The discriminator string used in fixture files.
    pub fn model_label(self) -> &'static str {
        match self {
            Kind::ExportType => "export.exporttype",
            Kind::ExportFilter => "export.exportfilter",
            Kind::Status => "export.status",
        }
    }
}

impl FromStr for Kind {
    type Err = ErrorDetail;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.model_label() == s)
            .ok_or_else(|| ErrorDetail::UnknownKind(s.to_owned()))
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.model_label())
    }
}

/// A fully validated fixture file.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub source: PathBuf,
    pub records: Vec<Record>,
}

impl Fixture {
    pub async fn read(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ErrorContext::new(path).error(ErrorDetail::ReadFixture(e)))?;
        Self::parse(path, &text)
    }

    pub fn parse(source: impl Into<PathBuf>, text: &str) -> Result<Self, Error> {
        let source = source.into();
        let value = serde_json::from_str::<Value>(text)
            .map_err(|e| ErrorContext::new(&source).error(ErrorDetail::ParseJson(e)))?;
        Self::from_value(source, value)
    }

    /// Validate every entry. The first invalid entry fails the whole fixture.
    pub fn from_value(source: impl Into<PathBuf>, value: Value) -> Result<Self, Error> {
        let source = source.into();
        let ctx = ErrorContext::new(&source);
        let entries = match value {
            Value::Array(entries) => entries,
            value => {
                return Err(ctx.error(ErrorDetail::TypeMismatch {
                    expected: "array",
                    got: value,
                }));
            }
        };
        let records = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| validate::record(&ctx.with_index(index), entry))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(source = %source.display(), count = records.len(), "fixture parsed");
        Ok(Self { source, records })
    }

    pub fn count(&self, kind: Kind) -> usize {
        self.records.iter().filter(|r| r.kind() == kind).count()
    }

    /// Render the records back into fixture JSON.
    pub fn to_value(&self) -> Value {
        Value::Array(self.records.iter().map(Record::to_fixture_value).collect())
    }
}

/// The fixture shipped with the crate.
pub fn bundled() -> Result<Fixture, Error> {
    Fixture::parse(BUNDLED_PATH, BUNDLED)
}
