//! Fixture loader
//!
//! Loading is all-or-nothing: every record of every fixture is validated and
//! keyed before the first write, and the writes of one load share a single
//! transaction.

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    Error, ErrorContext, ErrorDetail, ErrorKind,
    fixture::{Fixture, Kind, Record},
    schema::{self, TableSchema},
    sql,
    storage::{Client, Statement},
};

/// What to do when one load contains the same pk twice for a kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The last occurrence wins.
    #[default]
    Upsert,
    /// Fail the load.
    Reject,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError<DE> {
    #[error(transparent)]
    Fixture(#[from] Error),
    #[error("database: {0}")]
    Database(DE),
}

impl<DE> LoadError<DE> {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::Fixture(e) => e.kind(),
            LoadError::Database(_) => ErrorKind::Database,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Distinct rows written per kind.
    pub rows: IndexMap<Kind, usize>,
    /// Rows reported as touched by the database.
    pub affected: u64,
}

/// Rows keyed by pk, per kind, in first-seen order.
pub type Tables<'a> = IndexMap<Kind, IndexMap<&'a str, &'a Record>>;

pub struct Loader<C> {
    client: C,
    policy: DuplicatePolicy,
}

impl<C: Client> Loader<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            policy: DuplicatePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn migrate(&self) -> Result<(), LoadError<C::Error>> {
        self.client
            .migrate(&sql::ddl(&schema::ALL))
            .await
            .map_err(LoadError::Database)
    }

    /// Key every record by kind and pk, applying the duplicate policy.
    pub fn collect<'a>(&self, fixtures: &'a [Fixture]) -> Result<Tables<'a>, Error> {
        let mut tables = Kind::ALL
            .into_iter()
            .map(|kind| (kind, IndexMap::new()))
            .collect::<Tables>();
        for fixture in fixtures {
            let ctx = ErrorContext::new(&fixture.source);
            for (index, record) in fixture.records.iter().enumerate() {
                let kind = record.kind();
                let pk = record.pk();
                let rows = tables.entry(kind).or_default();
                if rows.insert(pk, record).is_some() {
                    match self.policy {
                        DuplicatePolicy::Upsert => {
                            debug!(%kind, pk, "duplicate primary key, keeping the last occurrence");
                        }
                        DuplicatePolicy::Reject => {
                            return Err(ctx.with_index(index).with_pk(pk).error(
                                ErrorDetail::DuplicatePrimaryKey {
                                    kind,
                                    pk: pk.to_owned(),
                                },
                            ));
                        }
                    }
                }
            }
        }
        Ok(tables)
    }

    pub async fn load(&self, fixtures: &[Fixture]) -> Result<LoadSummary, LoadError<C::Error>> {
        let tables = self.collect(fixtures)?;
        self.migrate().await?;
        let statements = tables
            .iter()
            .filter(|(_, rows)| !rows.is_empty())
            .map(|(kind, rows)| {
                let schema = TableSchema::of(*kind);
                Statement {
                    table: schema.table,
                    sql: sql::upsert(schema),
                    param: rows.values().map(|record| record.row()).collect(),
                }
            })
            .collect::<Vec<_>>();
        let affected = self
            .client
            .transaction(&statements)
            .await
            .map_err(LoadError::Database)?;
        let summary = LoadSummary {
            rows: tables
                .iter()
                .map(|(kind, rows)| (*kind, rows.len()))
                .collect(),
            affected,
        };
        info!(
            fixtures = fixtures.len(),
            export_types = summary.rows[&Kind::ExportType],
            export_filters = summary.rows[&Kind::ExportFilter],
            statuses = summary.rows[&Kind::Status],
            "fixtures loaded"
        );
        Ok(summary)
    }
}
