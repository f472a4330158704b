use std::convert::Infallible;

use tracing::info;

use super::sqlite::{self, Statement};

/// Logs statements instead of running them.
#[derive(Default)]
pub struct DebugClient {}

impl sqlite::Client for DebugClient {
    type Error = Infallible;

    async fn migrate(&self, script: &str) -> Result<(), Self::Error> {
        info!(script, "migrate");
        Ok(())
    }

    async fn transaction(&self, statements: &[Statement]) -> Result<u64, Self::Error> {
        let mut rows = 0;
        for statement in statements {
            let count = statement.param.as_array().map_or(0, Vec::len);
            info!(table = statement.table, rows = count, sql = %statement.sql, "upsert");
            rows += count as u64;
        }
        Ok(rows)
    }
}
