use std::str::FromStr;

use tracing::debug;

use super::sqlite::{self, Statement};

pub struct LocalDatabase {
    pool: sqlx::SqlitePool,
}

pub struct Client {
    pool: sqlx::SqlitePool,
}

impl LocalDatabase {
    pub async fn open(url: &str) -> Result<Self, sqlx::Error> {
        let options =
            sqlx::sqlite::SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let mut pool = sqlx::sqlite::SqlitePoolOptions::new();
        // in-memory databases use a shared cache, where a second connection
        // would see table locks instead of waiting on them
        if url.contains(":memory:") {
            pool = pool.max_connections(1);
        }
        let pool = pool.connect_with(options).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.pool
    }

    pub fn client(&self) -> Client {
        Client {
            pool: self.pool.clone(),
        }
    }
}

impl sqlite::Client for Client {
    type Error = sqlx::Error;

    async fn migrate(&self, script: &str) -> Result<(), Self::Error> {
        sqlx::raw_sql(script).execute(&self.pool).await?;
        Ok(())
    }

    async fn transaction(&self, statements: &[Statement]) -> Result<u64, Self::Error> {
        let mut tx = self.pool.begin().await?;
        let mut affected = 0;
        for statement in statements {
            let result = sqlx::query(&statement.sql)
                .bind(statement.param.to_string())
                .execute(&mut *tx)
                .await?;
            debug!(
                table = statement.table,
                rows = result.rows_affected(),
                "upsert"
            );
            affected += result.rows_affected();
        }
        tx.commit().await?;
        Ok(affected)
    }
}
