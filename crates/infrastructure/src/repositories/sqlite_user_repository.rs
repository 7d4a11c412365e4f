use async_trait::async_trait;
use domain::{DomainError, User, UserRepository};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use std::time::Duration;
use uuid::Uuid;

use super::{column, parse_timestamp, parse_uuid, with_timeout};

pub struct SqliteUserRepository {
    pool: SqlitePool,
    deadline: Duration,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool, deadline: Duration) -> Self {
        Self { pool, deadline }
    }
}

fn user_from_row(row: &SqliteRow) -> Result<User, DomainError> {
    let id: String = column(row, "id")?;
    let created_at: String = column(row, "created_at")?;
    let updated_at: String = column(row, "updated_at")?;

    Ok(User {
        id: Some(parse_uuid(&id, "user")?),
        username: column(row, "username")?,
        email: column(row, "email")?,
        password_hash: column(row, "password_hash")?,
        is_admin: column(row, "is_admin")?,
        created_at: parse_timestamp(&created_at, "user")?,
        updated_at: parse_timestamp(&updated_at, "user")?,
    })
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let row = with_timeout(
            self.deadline,
            "find user by id",
            sqlx::query("SELECT * FROM users WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool),
        )
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = with_timeout(
            self.deadline,
            "find user by email",
            sqlx::query("SELECT * FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool),
        )
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let rows = with_timeout(
            self.deadline,
            "list users",
            sqlx::query("SELECT * FROM users").fetch_all(&self.pool),
        )
        .await?;

        rows.iter().map(user_from_row).collect()
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let mut saved = user.clone();
        let id = saved.id.unwrap_or_else(Uuid::new_v4);
        saved.id = Some(id);

        with_timeout(
            self.deadline,
            "save user",
            sqlx::query(
                "INSERT INTO users (id, username, email, password_hash, is_admin, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(id.to_string())
            .bind(&saved.username)
            .bind(&saved.email)
            .bind(&saved.password_hash)
            .bind(saved.is_admin)
            .bind(saved.created_at.to_rfc3339())
            .bind(saved.updated_at.to_rfc3339())
            .execute(&self.pool),
        )
        .await?;

        Ok(saved)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let id = user
            .id
            .ok_or_else(|| DomainError::ValidationError("user id required for update".to_string()))?;

        let result = with_timeout(
            self.deadline,
            "update user",
            sqlx::query(
                "UPDATE users SET username = ?, email = ?, password_hash = ?, is_admin = ?, updated_at = ?
                 WHERE id = ?",
            )
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.is_admin)
            .bind(user.updated_at.to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!("User not found: {}", id)));
        }

        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use std::sync::Arc;

    async fn repository() -> SqliteUserRepository {
        let database = Database::connect("sqlite::memory:").await.unwrap();
        SqliteUserRepository::new(database.pool().clone(), Duration::from_secs(5))
    }

    fn user(email: &str) -> User {
        User::new("someone".to_string(), email.to_string(), "$2b$10$hash".to_string())
    }

    #[tokio::test]
    async fn save_then_find_round_trip() {
        let repo = repository().await;
        let saved = repo.save(&user("a@example.com")).await.unwrap();
        let id = saved.id.unwrap();

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found, saved);

        let by_email = repo.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, Some(id));

        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
        assert!(repo.find_by_email("x@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_maps_to_conflict() {
        let repo = repository().await;
        repo.save(&user("dup@example.com")).await.unwrap();

        let err = repo.save(&user("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_persists_changes() {
        let repo = repository().await;
        let mut saved = repo.save(&user("b@example.com")).await.unwrap();

        saved.username = "renamed".to_string();
        saved.is_admin = true;
        repo.update(&saved).await.unwrap();

        let found = repo.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(found.username, "renamed");
        assert!(found.is_admin);
    }

    #[tokio::test]
    async fn update_of_missing_user_is_not_found() {
        let repo = repository().await;
        let mut ghost = user("ghost@example.com");
        ghost.id = Some(Uuid::new_v4());

        let err = repo.update(&ghost).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn works_behind_the_trait_object() {
        let repo: Arc<dyn UserRepository> = Arc::new(repository().await);
        let saved = repo.save(&user("dyn@example.com")).await.unwrap();
        assert!(repo.find_by_id(saved.id.unwrap()).await.unwrap().is_some());
    }
}
