//! Read-side access to the loaded lookup tables.

use tracing::warn;

use crate::{
    Error, ErrorContext, ErrorDetail,
    fixture::{ExportFilter, ExportType, Fixture, JobStatus, Record},
    schema::{self, TableSchema},
    sql,
    vocabulary::StatusCode,
};

/// Path reported when a dump fails.
const DUMP_SOURCE: &str = "<database>";

pub struct Registry {
    pool: sqlx::SqlitePool,
}

impl Registry {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }

    async fn all<R>(&self, schema: &TableSchema) -> Result<Vec<R>, Error>
    where
        R: for<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> + Send + Unpin,
    {
        sqlx::query_as::<_, R>(&sql::select_all(schema))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ErrorContext::new(schema.table).error(ErrorDetail::Query(e)))
    }

    async fn one<R>(&self, schema: &TableSchema, pk: &str) -> Result<Option<R>, Error>
    where
        R: for<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> + Send + Unpin,
    {
        sqlx::query_as::<_, R>(&sql::select_by_id(schema))
            .bind(pk)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                ErrorContext::new(schema.table)
                    .with_pk(pk)
                    .error(ErrorDetail::Query(e))
            })
    }

    /// Exporters in presentation order.
    pub async fn export_types(&self) -> Result<Vec<ExportType>, Error> {
        self.all(&schema::EXPORT_TYPE).await
    }

    pub async fn export_type(&self, pk: &str) -> Result<Option<ExportType>, Error> {
        self.one(&schema::EXPORT_TYPE, pk).await
    }

    /// Filters in presentation order.
    pub async fn export_filters(&self) -> Result<Vec<ExportFilter>, Error> {
        self.all(&schema::EXPORT_FILTER).await
    }

    pub async fn export_filter(&self, pk: &str) -> Result<Option<ExportFilter>, Error> {
        self.one(&schema::EXPORT_FILTER, pk).await
    }

    pub async fn statuses(&self) -> Result<Vec<JobStatus>, Error> {
        self.all(&schema::STATUS).await
    }

    pub async fn status(&self, pk: &str) -> Result<Option<JobStatus>, Error> {
        self.one(&schema::STATUS, pk).await
    }

    /// Resolve a status code a job wants to record. Codes missing from the
    /// table fall back to `unknown`, which therefore has to be loaded.
    pub async fn status_or_unknown(&self, pk: &str) -> Result<JobStatus, Error> {
        if let Some(status) = self.status(pk).await? {
            return Ok(status);
        }
        warn!(status = pk, "status not defined in database, using unknown");
        let unknown = StatusCode::Unknown.as_str();
        self.status(unknown).await?.ok_or_else(|| {
            ErrorContext::new(schema::STATUS.table)
                .with_pk(unknown)
                .error(ErrorDetail::UndefinedStatus(pk.to_owned()))
        })
    }

    /// The tables rendered as a fixture, kinds in fixture order.
    pub async fn dump(&self) -> Result<Fixture, Error> {
        let mut records = Vec::new();
        records.extend(self.export_types().await?.into_iter().map(Record::from));
        records.extend(self.export_filters().await?.into_iter().map(Record::from));
        records.extend(self.statuses().await?.into_iter().map(Record::from));
        Ok(Fixture {
            source: DUMP_SOURCE.into(),
            records,
        })
    }
}
