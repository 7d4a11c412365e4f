use crate::entities::Movie;
use crate::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>, DomainError>;
    async fn find_all(&self) -> Result<Vec<Movie>, DomainError>;
    async fn save(&self, movie: &Movie) -> Result<Movie, DomainError>;

    /// Conditional write keyed on the revision the caller read. Returns the
    /// persisted movie, or None when the stored revision no longer matches
    /// (somebody else wrote in between).
    async fn update_guarded(&self, movie: &Movie) -> Result<Option<Movie>, DomainError>;

    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;

    async fn find_newest(&self, limit: u32) -> Result<Vec<Movie>, DomainError>;
    async fn find_most_reviewed(&self, limit: u32) -> Result<Vec<Movie>, DomainError>;
    async fn sample_random(&self, limit: u32) -> Result<Vec<Movie>, DomainError>;
}
