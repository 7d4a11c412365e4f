use crate::entities::Genre;
use crate::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait GenreRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Genre>, DomainError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Genre>, DomainError>;
    async fn find_all(&self) -> Result<Vec<Genre>, DomainError>;
    async fn save(&self, genre: &Genre) -> Result<Genre, DomainError>;
    async fn update(&self, genre: &Genre) -> Result<Genre, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}
