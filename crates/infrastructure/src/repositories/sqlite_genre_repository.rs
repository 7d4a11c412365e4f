use async_trait::async_trait;
use domain::{DomainError, Genre, GenreRepository};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use std::time::Duration;
use uuid::Uuid;

use super::{column, parse_timestamp, parse_uuid, with_timeout};

pub struct SqliteGenreRepository {
    pool: SqlitePool,
    deadline: Duration,
}

impl SqliteGenreRepository {
    pub fn new(pool: SqlitePool, deadline: Duration) -> Self {
        Self { pool, deadline }
    }
}

fn genre_from_row(row: &SqliteRow) -> Result<Genre, DomainError> {
    let id: String = column(row, "id")?;
    let created_at: String = column(row, "created_at")?;
    let updated_at: String = column(row, "updated_at")?;

    Ok(Genre {
        id: Some(parse_uuid(&id, "genre")?),
        name: column(row, "name")?,
        created_at: parse_timestamp(&created_at, "genre")?,
        updated_at: parse_timestamp(&updated_at, "genre")?,
    })
}

#[async_trait]
impl GenreRepository for SqliteGenreRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Genre>, DomainError> {
        let row = with_timeout(
            self.deadline,
            "find genre by id",
            sqlx::query("SELECT * FROM genres WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool),
        )
        .await?;

        row.as_ref().map(genre_from_row).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Genre>, DomainError> {
        let row = with_timeout(
            self.deadline,
            "find genre by name",
            sqlx::query("SELECT * FROM genres WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool),
        )
        .await?;

        row.as_ref().map(genre_from_row).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Genre>, DomainError> {
        let rows = with_timeout(
            self.deadline,
            "list genres",
            sqlx::query("SELECT * FROM genres").fetch_all(&self.pool),
        )
        .await?;

        rows.iter().map(genre_from_row).collect()
    }

    async fn save(&self, genre: &Genre) -> Result<Genre, DomainError> {
        let mut saved = genre.clone();
        let id = saved.id.unwrap_or_else(Uuid::new_v4);
        saved.id = Some(id);

        with_timeout(
            self.deadline,
            "save genre",
            sqlx::query(
                "INSERT INTO genres (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)",
            )
            .bind(id.to_string())
            .bind(&saved.name)
            .bind(saved.created_at.to_rfc3339())
            .bind(saved.updated_at.to_rfc3339())
            .execute(&self.pool),
        )
        .await?;

        Ok(saved)
    }

    async fn update(&self, genre: &Genre) -> Result<Genre, DomainError> {
        let id = genre.id.ok_or_else(|| {
            DomainError::ValidationError("genre id required for update".to_string())
        })?;

        let result = with_timeout(
            self.deadline,
            "update genre",
            sqlx::query("UPDATE genres SET name = ?, updated_at = ? WHERE id = ?")
                .bind(&genre.name)
                .bind(genre.updated_at.to_rfc3339())
                .bind(id.to_string())
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("Genre not found: {}", id)));
        }

        Ok(genre.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        with_timeout(
            self.deadline,
            "delete genre",
            sqlx::query("DELETE FROM genres WHERE id = ?")
                .bind(id.to_string())
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    async fn repository() -> SqliteGenreRepository {
        let database = Database::connect("sqlite::memory:").await.unwrap();
        SqliteGenreRepository::new(database.pool().clone(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn save_then_find_round_trip() {
        let repo = repository().await;
        let saved = repo.save(&Genre::new("Drama".to_string())).await.unwrap();

        let by_id = repo.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(by_id, saved);

        let by_name = repo.find_by_name("Drama").await.unwrap().unwrap();
        assert_eq!(by_name.id, saved.id);
    }

    #[tokio::test]
    async fn duplicate_name_maps_to_conflict() {
        let repo = repository().await;
        repo.save(&Genre::new("Drama".to_string())).await.unwrap();

        let err = repo
            .save(&Genre::new("Drama".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_and_delete() {
        let repo = repository().await;
        let mut saved = repo.save(&Genre::new("Horrr".to_string())).await.unwrap();

        saved.rename("Horror".to_string());
        repo.update(&saved).await.unwrap();
        assert!(repo.find_by_name("Horror").await.unwrap().is_some());

        repo.delete(saved.id.unwrap()).await.unwrap();
        assert!(repo.find_by_id(saved.id.unwrap()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_of_missing_genre_is_not_found() {
        let repo = repository().await;
        let mut ghost = Genre::new("Ghost".to_string());
        ghost.id = Some(Uuid::new_v4());

        assert!(matches!(
            repo.update(&ghost).await.unwrap_err(),
            DomainError::NotFound(_)
        ));
    }
}
