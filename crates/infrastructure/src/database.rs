use domain::DomainError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

const CREATE_USERS: &str = "
CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY,
    username      TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    is_admin      INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
)";

const CREATE_GENRES: &str = "
CREATE TABLE IF NOT EXISTS genres (
    id         TEXT PRIMARY KEY,
    name       TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

// Movies are stored document-style: the review sequence and cast list are
// JSON owned by the row, and `revision` guards conditional writes.
const CREATE_MOVIES: &str = "
CREATE TABLE IF NOT EXISTS movies (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    year        INTEGER NOT NULL,
    detail      TEXT NOT NULL,
    cast_members TEXT NOT NULL,
    genre_id    TEXT,
    image       TEXT,
    rating      REAL NOT NULL DEFAULT 0,
    num_reviews INTEGER NOT NULL DEFAULT 0,
    reviews     TEXT NOT NULL,
    revision    INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
)";

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the store and bootstrap the schema. In-memory databases are
    /// pinned to a single connection so every handle sees the same data.
    pub async fn connect(url: &str) -> Result<Self, DomainError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| DomainError::RepositoryError(format!("invalid database url: {}", e)))?
            .create_if_missing(true);

        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                DomainError::RepositoryError(format!("failed to open database: {}", e))
            })?;

        for statement in [CREATE_USERS, CREATE_GENRES, CREATE_MOVIES] {
            sqlx::query(statement).execute(&pool).await.map_err(|e| {
                DomainError::RepositoryError(format!("schema bootstrap failed: {}", e))
            })?;
        }

        Ok(Database { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
