use crate::entities::Genre;
use crate::errors::DomainError;
use crate::repositories::GenreRepository;
use std::sync::Arc;
use uuid::Uuid;

/// Genre management. Names are unique; uniqueness is checked before the
/// save, with the store's constraint as the backstop.
pub struct GenreService {
    genre_repository: Arc<dyn GenreRepository>,
}

impl GenreService {
    pub fn new(genre_repository: Arc<dyn GenreRepository>) -> Self {
        Self { genre_repository }
    }

    pub async fn create_genre(&self, name: String) -> Result<Genre, DomainError> {
        let genre = Genre::new(name);
        genre.validate()?;

        if self
            .genre_repository
            .find_by_name(&genre.name)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict("Already exists".to_string()));
        }

        self.genre_repository.save(&genre).await
    }

    pub async fn get_genre(&self, id: Uuid) -> Result<Genre, DomainError> {
        match self.genre_repository.find_by_id(id).await? {
            Some(genre) => Ok(genre),
            None => Err(DomainError::NotFound(format!("Genre not found: {}", id))),
        }
    }

    pub async fn update_genre(&self, id: Uuid, name: String) -> Result<Genre, DomainError> {
        let mut genre = self.get_genre(id).await?;
        genre.rename(name);
        genre.validate()?;

        self.genre_repository.update(&genre).await
    }

    /// Movies referencing the genre are left untouched; the dangling
    /// reference is a known gap carried over from the original behavior.
    pub async fn delete_genre(&self, id: Uuid) -> Result<Genre, DomainError> {
        let genre = self.get_genre(id).await?;
        self.genre_repository.delete(id).await?;
        Ok(genre)
    }

    pub async fn get_all_genres(&self) -> Result<Vec<Genre>, DomainError> {
        self.genre_repository.find_all().await
    }
}
