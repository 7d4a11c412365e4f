pub mod sqlite_genre_repository;
pub mod sqlite_movie_repository;
pub mod sqlite_user_repository;

pub use sqlite_genre_repository::SqliteGenreRepository;
pub use sqlite_movie_repository::SqliteMovieRepository;
pub use sqlite_user_repository::SqliteUserRepository;

use chrono::{DateTime, Utc};
use domain::DomainError;
use sqlx::sqlite::SqliteRow;
use sqlx::{Decode, Row, Sqlite, Type};
use std::future::Future;
use std::time::Duration;

// Every store call gets a bounded deadline; a blown deadline surfaces as
// its own error kind instead of hanging the request.
pub(crate) async fn with_timeout<T, F>(
    deadline: Duration,
    what: &str,
    fut: F,
) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result.map_err(|e| map_sqlx_error(e, what)),
        Err(_) => Err(DomainError::Timeout(format!("{} timed out", what))),
    }
}

pub(crate) fn map_sqlx_error(err: sqlx::Error, what: &str) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return DomainError::Conflict(format!("{}: duplicate value", what));
        }
    }
    DomainError::RepositoryError(format!("{} failed: {}", what, err))
}

pub(crate) fn parse_timestamp(raw: &str, what: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::RepositoryError(format!("corrupt {} timestamp: {}", what, e)))
}

pub(crate) fn parse_uuid(raw: &str, what: &str) -> Result<uuid::Uuid, DomainError> {
    uuid::Uuid::parse_str(raw)
        .map_err(|e| DomainError::RepositoryError(format!("corrupt {} id: {}", what, e)))
}

pub(crate) fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, DomainError>
where
    T: Decode<'r, Sqlite> + Type<Sqlite>,
{
    row.try_get(name)
        .map_err(|e| DomainError::RepositoryError(format!("read column {}: {}", name, e)))
}
