use serde_json::Value;

/// A statement taking a single JSON parameter.
#[derive(Debug, Clone)]
pub struct Statement {
    pub table: &'static str,
    pub sql: String,
    pub param: Value,
}

pub trait Client {
    type Error: std::error::Error;

    /// Run a script of DDL statements without parameters.
    fn migrate(&self, script: &str) -> impl Future<Output = Result<(), Self::Error>>;

    /// Run all statements in one transaction and return the number of rows
    /// touched. Nothing is committed if any statement fails.
    fn transaction(
        &self,
        statements: &[Statement],
    ) -> impl Future<Output = Result<u64, Self::Error>>;
}
