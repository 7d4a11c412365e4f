use crate::entities::{Movie, Review};
use crate::errors::DomainError;
use crate::repositories::MovieRepository;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

// Browse endpoints (new/top/random) all return at most this many movies.
const LIST_LIMIT: u32 = 10;

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub name: String,
    pub year: i32,
    pub detail: String,
    pub cast: Vec<String>,
    pub genre_id: Option<Uuid>,
    pub image: Option<String>,
}

/// Partial movie change; absent fields keep their current value.
#[derive(Debug, Default, Clone)]
pub struct MovieUpdate {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub detail: Option<String>,
    pub cast: Option<Vec<String>>,
    pub genre_id: Option<Uuid>,
    pub image: Option<String>,
}

/// Catalog and review workflows. Review mutations load the document,
/// mutate it through the entity (which owns the aggregate invariants) and
/// persist with a revision-guarded write, so two racing writers cannot
/// silently drop each other's reviews.
pub struct MovieService {
    movie_repository: Arc<dyn MovieRepository>,
}

impl MovieService {
    pub fn new(movie_repository: Arc<dyn MovieRepository>) -> Self {
        Self { movie_repository }
    }

    pub async fn create_movie(&self, payload: NewMovie) -> Result<Movie, DomainError> {
        let movie = Movie::new(
            payload.name,
            payload.year,
            payload.detail,
            payload.cast,
            payload.genre_id,
            payload.image,
        );
        movie.validate()?;

        self.movie_repository.save(&movie).await
    }

    pub async fn get_all_movies(&self) -> Result<Vec<Movie>, DomainError> {
        self.movie_repository.find_all().await
    }

    pub async fn get_movie(&self, id: Uuid) -> Result<Movie, DomainError> {
        match self.movie_repository.find_by_id(id).await? {
            Some(movie) => Ok(movie),
            None => Err(DomainError::NotFound(format!("Movie not found: {}", id))),
        }
    }

    pub async fn update_movie(&self, id: Uuid, update: MovieUpdate) -> Result<Movie, DomainError> {
        let mut movie = self.get_movie(id).await?;

        if let Some(name) = update.name {
            movie.name = name;
        }
        if let Some(year) = update.year {
            movie.year = year;
        }
        if let Some(detail) = update.detail {
            movie.detail = detail;
        }
        if let Some(cast) = update.cast {
            movie.cast = cast;
        }
        if let Some(genre_id) = update.genre_id {
            movie.genre_id = Some(genre_id);
        }
        if let Some(image) = update.image {
            movie.image = Some(image);
        }

        movie.validate()?;
        movie.updated_at = Utc::now();
        self.persist_guarded(movie).await
    }

    pub async fn delete_movie(&self, id: Uuid) -> Result<(), DomainError> {
        // Embedded reviews die with the document; nothing else to clean up.
        self.get_movie(id).await?;
        self.movie_repository.delete(id).await
    }

    /// Append a review on behalf of a user. One review per user per movie.
    pub async fn add_review(
        &self,
        movie_id: Uuid,
        user_id: Uuid,
        author: String,
        rating: u8,
        comment: String,
    ) -> Result<Movie, DomainError> {
        let mut movie = self.get_movie(movie_id).await?;
        movie.add_review(Review::new(user_id, author, rating, comment))?;
        self.persist_guarded(movie).await
    }

    pub async fn delete_review(
        &self,
        movie_id: Uuid,
        review_id: Uuid,
    ) -> Result<Movie, DomainError> {
        let mut movie = self.get_movie(movie_id).await?;
        movie.remove_review(review_id)?;
        self.persist_guarded(movie).await
    }

    pub async fn get_new_movies(&self) -> Result<Vec<Movie>, DomainError> {
        self.movie_repository.find_newest(LIST_LIMIT).await
    }

    /// Popularity ranking by review count, not by average rating.
    pub async fn get_top_movies(&self) -> Result<Vec<Movie>, DomainError> {
        self.movie_repository.find_most_reviewed(LIST_LIMIT).await
    }

    pub async fn get_random_movies(&self) -> Result<Vec<Movie>, DomainError> {
        self.movie_repository.sample_random(LIST_LIMIT).await
    }

    async fn persist_guarded(&self, movie: Movie) -> Result<Movie, DomainError> {
        match self.movie_repository.update_guarded(&movie).await? {
            Some(saved) => Ok(saved),
            None => Err(DomainError::Conflict(
                "Movie was modified concurrently, retry".to_string(),
            )),
        }
    }
}
