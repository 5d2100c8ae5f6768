#![forbid(unsafe_code)]

use rusqlite::ErrorCode;
use tissue_core::tags::TagSetError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("{0}")]
    NotFound(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO",
            Self::Sql(_) => "SQLITE",
            Self::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            Self::NotFound(_) => "NOT_FOUND",
        }
    }

    pub(crate) fn issue_not_found(id: i64) -> Self {
        Self::NotFound(format!("issue #{id} does not exist"))
    }

    pub(crate) fn tag_not_found(tag_id: i64, issue_id: i64) -> Self {
        Self::NotFound(format!("tag #{tag_id} does not exist on issue #{issue_id}"))
    }

    /// Prefixes constraint messages with the batch position of the failing issue.
    pub(crate) fn in_batch(self, index: usize) -> Self {
        match self {
            Self::ConstraintViolation(message) => {
                Self::ConstraintViolation(format!("issue[{index}]: {message}"))
            }
            other => other,
        }
    }
}

impl From<TagSetError> for StoreError {
    fn from(value: TagSetError) -> Self {
        Self::ConstraintViolation(value.to_string())
    }
}

/// Maps schema-level constraint failures (NOT NULL, CHECK, FOREIGN KEY) raised
/// by a write to `ConstraintViolation`; every other engine error stays `Sql`.
pub(crate) fn map_write_error(err: rusqlite::Error) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(code, message)
            if code.code == ErrorCode::ConstraintViolation =>
        {
            let detail = message
                .clone()
                .unwrap_or_else(|| "sqlite constraint failed".to_string());
            StoreError::ConstraintViolation(detail)
        }
        _ => StoreError::Sql(err),
    }
}
