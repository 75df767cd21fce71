use sqlx::error::ErrorKind;
use thiserror::Error;

/// Errors surfaced by the query layer. Nothing here is retried.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The query matched no row where one was expected.
    #[error("{0} not found")]
    NotFound(String),

    /// A schema constraint rejected the statement (missing account,
    /// failed CHECK, duplicate key, ...).
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// The backend could not be reached or the connection was lost.
    #[error("database unreachable: {0}")]
    Connectivity(#[source] sqlx::Error),

    /// A stored value could not be turned back into a domain value.
    #[error("invalid stored data: {0}")]
    Decode(String),

    #[error("migration {0} is applied but unknown to this build")]
    UnknownMigration(i64),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        StoreError::NotFound(format!("{} {}", entity, id))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, StoreError::ConstraintViolation(_))
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, StoreError::Connectivity(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("row".to_string()),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::ForeignKeyViolation
                | ErrorKind::UniqueViolation
                | ErrorKind::CheckViolation
                | ErrorKind::NotNullViolation => {
                    StoreError::ConstraintViolation(db_err.message().to_string())
                }
                _ => StoreError::Database(sqlx::Error::Database(db_err)),
            },
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Connectivity(err),
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_) => StoreError::Decode(err.to_string()),
            other => StoreError::Database(other),
        }
    }
}
