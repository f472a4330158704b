use std::path::PathBuf;

pub mod config;
pub mod fixture;
pub mod lint;
pub mod loader;
pub mod registry;
pub mod schema;
pub mod sql;
pub mod storage;
pub mod vocabulary;

#[cfg(test)]
mod tests;

pub use fixture::Kind;
pub use loader::{DuplicatePolicy, LoadSummary, Loader};
pub use registry::Registry;

#[derive(Debug, thiserror::Error)]
#[error("{context}: {detail}")]
pub struct Error {
    pub context: Box<ErrorContext>,
    pub detail: Box<ErrorDetail>,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        self.detail.kind()
    }
}

#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub path: PathBuf,
    pub index: Option<usize>,
    pub pk: Option<String>,
}

impl ErrorContext {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            index: None,
            pk: None,
        }
    }

    pub(crate) fn with_index(&self, index: usize) -> Self {
        Self {
            path: self.path.clone(),
            index: Some(index),
            pk: None,
        }
    }

    pub(crate) fn with_pk(&self, pk: impl Into<String>) -> Self {
        Self {
            path: self.path.clone(),
            index: self.index,
            pk: Some(pk.into()),
        }
    }

    pub(crate) fn error(&self, detail: ErrorDetail) -> Error {
        Error {
            context: Box::new(self.clone()),
            detail: Box::new(detail),
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())?;
        if let Some(index) = self.index {
            write!(f, "[{index}]")?;
        }
        if let Some(pk) = &self.pk {
            write!(f, "({pk})")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    UnknownKind,
    DuplicatePrimaryKey,
    Io,
    Database,
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorDetail {
    #[error("Failed to read fixture: {0}")]
    ReadFixture(std::io::Error),
    #[error("Failed to parse JSON fixture: {0}")]
    ParseJson(serde_json::Error),
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        expected: &'static str,
        got: serde_json::Value,
    },
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Empty field: {0}")]
    EmptyField(String),
    #[error("Unexpected field: {0}")]
    UnexpectedField(String),
    #[error("Unknown model: {0}")]
    UnknownKind(String),
    #[error("Status {0} is not defined and there is no unknown status to fall back to")]
    UndefinedStatus(String),
    #[error("Duplicate primary key {pk} for {kind}")]
    DuplicatePrimaryKey { kind: Kind, pk: String },
    #[error("SQL Error: {0}")]
    Query(sqlx::Error),
}

impl ErrorDetail {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorDetail::ReadFixture(_) => ErrorKind::Io,
            ErrorDetail::ParseJson(_)
            | ErrorDetail::TypeMismatch { .. }
            | ErrorDetail::MissingField(_)
            | ErrorDetail::EmptyField(_)
            | ErrorDetail::UnexpectedField(_)
            | ErrorDetail::UndefinedStatus(_) => ErrorKind::Validation,
            ErrorDetail::UnknownKind(_) => ErrorKind::UnknownKind,
            ErrorDetail::DuplicatePrimaryKey { .. } => ErrorKind::DuplicatePrimaryKey,
            ErrorDetail::Query(_) => ErrorKind::Database,
        }
    }
}
