//! Typed records of the export fixture
//!
//! Each struct mirrors one lookup table row. Serializing a record yields the
//! row as the upsert statements consume it, keyed by column name.

use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;

use super::Kind;

/// Value of the nested `model` field for exporters that do not act on a
/// single record type.
pub const NO_RECORD_MODEL: &str = "None";

/// A registered exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ExportType {
    pub pk: String,
    pub path: String,
    /// The record type the exporter acts on. Stored under `model` in fixtures.
    pub record_model: Option<String>,
    pub order: i64,
    pub label: String,
    pub description: String,
}

impl ExportType {
    /// Name of the exporter implementation, the last segment of `path`.
    pub fn exporter_name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }

    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("path".into(), self.path.clone().into());
        fields.insert(
            "model".into(),
            self.record_model
                .clone()
                .unwrap_or_else(|| NO_RECORD_MODEL.to_owned())
                .into(),
        );
        fields.insert("order".into(), self.order.into());
        fields.insert("label".into(), self.label.clone().into());
        fields.insert("description".into(), self.description.clone().into());
        fields
    }
}

/// A record selection strategy offered when launching an export job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ExportFilter {
    pub pk: String,
    pub order: i64,
    pub label: String,
    pub description: String,
}

impl ExportFilter {
    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("order".into(), self.order.into());
        fields.insert("label".into(), self.label.clone().into());
        fields.insert("description".into(), self.description.clone().into());
        fields
    }
}

/// A state an export job may occupy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct JobStatus {
    pub pk: String,
    pub label: String,
    pub description: String,
}

impl JobStatus {
    fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("label".into(), self.label.clone().into());
        fields.insert("description".into(), self.description.clone().into());
        fields
    }
}

/// One validated fixture entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    ExportType(ExportType),
    ExportFilter(ExportFilter),
    Status(JobStatus),
}

impl Record {
    pub fn kind(&self) -> Kind {
        match self {
            Record::ExportType(_) => Kind::ExportType,
            Record::ExportFilter(_) => Kind::ExportFilter,
            Record::Status(_) => Kind::Status,
        }
    }

    pub fn pk(&self) -> &str {
        match self {
            Record::ExportType(row) => &row.pk,
            Record::ExportFilter(row) => &row.pk,
            Record::Status(row) => &row.pk,
        }
    }

    /// The row as bound into the upsert statement of its table.
    pub fn row(&self) -> Value {
        let row = match self {
            Record::ExportType(row) => serde_json::to_value(row),
            Record::ExportFilter(row) => serde_json::to_value(row),
            Record::Status(row) => serde_json::to_value(row),
        };
        // plain structs of strings and integers always serialize
        row.unwrap_or(Value::Null)
    }

    /// The record in fixture form: `{"fields": ..., "model": ..., "pk": ...}`.
    pub fn to_fixture_value(&self) -> Value {
        let fields = match self {
            Record::ExportType(row) => row.fields(),
            Record::ExportFilter(row) => row.fields(),
            Record::Status(row) => row.fields(),
        };
        let mut object = Map::new();
        object.insert("fields".into(), Value::Object(fields));
        object.insert("model".into(), self.kind().model_label().into());
        object.insert("pk".into(), self.pk().into());
        Value::Object(object)
    }
}

impl From<ExportType> for Record {
    fn from(row: ExportType) -> Self {
        Record::ExportType(row)
    }
}

impl From<ExportFilter> for Record {
    fn from(row: ExportFilter) -> Self {
        Record::ExportFilter(row)
    }
}

impl From<JobStatus> for Record {
    fn from(row: JobStatus) -> Self {
        Record::Status(row)
    }
}
