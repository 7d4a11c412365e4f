//! In-memory repository fakes for service tests.

use crate::entities::{Genre, Movie, User};
use crate::errors::DomainError;
use crate::repositories::{GenreRepository, MovieRepository, UserRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let mut saved = user.clone();
        let id = saved.id.unwrap_or_else(Uuid::new_v4);
        saved.id = Some(id);
        self.users.lock().unwrap().insert(id, saved.clone());
        Ok(saved)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let id = user
            .id
            .ok_or_else(|| DomainError::ValidationError("user id required".to_string()))?;
        let mut users = self.users.lock().unwrap();
        if !users.contains_key(&id) {
            return Err(DomainError::NotFound(format!("User not found: {}", id)));
        }
        users.insert(id, user.clone());
        Ok(user.clone())
    }
}

#[derive(Default)]
pub struct InMemoryMovieRepository {
    movies: Mutex<HashMap<Uuid, Movie>>,
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>, DomainError> {
        Ok(self.movies.lock().unwrap().get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Movie>, DomainError> {
        Ok(self.movies.lock().unwrap().values().cloned().collect())
    }

    async fn save(&self, movie: &Movie) -> Result<Movie, DomainError> {
        let mut saved = movie.clone();
        let id = saved.id.unwrap_or_else(Uuid::new_v4);
        saved.id = Some(id);
        self.movies.lock().unwrap().insert(id, saved.clone());
        Ok(saved)
    }

    async fn update_guarded(&self, movie: &Movie) -> Result<Option<Movie>, DomainError> {
        let id = movie
            .id
            .ok_or_else(|| DomainError::ValidationError("movie id required".to_string()))?;
        let mut movies = self.movies.lock().unwrap();
        match movies.get(&id) {
            Some(stored) if stored.revision == movie.revision => {
                let mut saved = movie.clone();
                saved.revision += 1;
                movies.insert(id, saved.clone());
                Ok(Some(saved))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.movies.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn find_newest(&self, limit: u32) -> Result<Vec<Movie>, DomainError> {
        let mut all: Vec<Movie> = self.movies.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.truncate(limit as usize);
        Ok(all)
    }

    async fn find_most_reviewed(&self, limit: u32) -> Result<Vec<Movie>, DomainError> {
        let mut all: Vec<Movie> = self.movies.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| b.num_reviews.cmp(&a.num_reviews));
        all.truncate(limit as usize);
        Ok(all)
    }

    async fn sample_random(&self, limit: u32) -> Result<Vec<Movie>, DomainError> {
        // HashMap iteration order is good enough randomness for tests.
        let all: Vec<Movie> = self
            .movies
            .lock()
            .unwrap()
            .values()
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(all)
    }
}

#[derive(Default)]
pub struct InMemoryGenreRepository {
    genres: Mutex<HashMap<Uuid, Genre>>,
}

impl InMemoryGenreRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GenreRepository for InMemoryGenreRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Genre>, DomainError> {
        Ok(self.genres.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Genre>, DomainError> {
        Ok(self
            .genres
            .lock()
            .unwrap()
            .values()
            .find(|g| g.name == name)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Genre>, DomainError> {
        Ok(self.genres.lock().unwrap().values().cloned().collect())
    }

    async fn save(&self, genre: &Genre) -> Result<Genre, DomainError> {
        let mut saved = genre.clone();
        let id = saved.id.unwrap_or_else(Uuid::new_v4);
        saved.id = Some(id);
        self.genres.lock().unwrap().insert(id, saved.clone());
        Ok(saved)
    }

    async fn update(&self, genre: &Genre) -> Result<Genre, DomainError> {
        let id = genre
            .id
            .ok_or_else(|| DomainError::ValidationError("genre id required".to_string()))?;
        let mut genres = self.genres.lock().unwrap();
        if !genres.contains_key(&id) {
            return Err(DomainError::NotFound(format!("Genre not found: {}", id)));
        }
        genres.insert(id, genre.clone());
        Ok(genre.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.genres.lock().unwrap().remove(&id);
        Ok(())
    }
}
