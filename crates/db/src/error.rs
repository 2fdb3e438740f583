use crate::query::QueryBuildError;

/// Errors surfaced by the repository layer.
///
/// "Not found" is not an error here: lookups return `Option` and the caller
/// decides how to report a missing row.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A statement could not be assembled. Indicates a programming bug.
    #[error(transparent)]
    QueryBuild(#[from] QueryBuildError),

    /// A result row did not have the expected shape or types.
    #[error("Failed to decode row: {0}")]
    RowDecode(#[source] sqlx::Error),

    /// The database rejected or failed to run a statement.
    #[error("Database error: {0}")]
    Execution(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::Decode(_) => RepoError::RowDecode(err),
            other => RepoError::Execution(other),
        }
    }
}
