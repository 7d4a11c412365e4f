use domain::{
    DomainError, GenreRepository, GenreService, MovieRepository, MovieService, SessionService,
    UserRepository, UserService,
};
use infrastructure::{
    Database, SqliteGenreRepository, SqliteMovieRepository, SqliteUserRepository,
};
use std::sync::Arc;
use std::time::Duration;

/// Catalog application - wires the store into the domain services.
pub struct CatalogApp {
    pub user_service: UserService,
    pub movie_service: MovieService,
    pub genre_service: GenreService,
    pub session_service: SessionService,
}

impl CatalogApp {
    pub async fn new(
        database_url: &str,
        session_secret: &str,
        session_ttl_days: i64,
        store_deadline: Duration,
    ) -> Result<Self, DomainError> {
        // Infrastructure layer - store setup
        let database = Database::connect(database_url).await?;
        let pool = database.pool().clone();

        // Repository implementations
        let user_repository: Arc<dyn UserRepository> =
            Arc::new(SqliteUserRepository::new(pool.clone(), store_deadline));
        let movie_repository: Arc<dyn MovieRepository> =
            Arc::new(SqliteMovieRepository::new(pool.clone(), store_deadline));
        let genre_repository: Arc<dyn GenreRepository> =
            Arc::new(SqliteGenreRepository::new(pool, store_deadline));

        Ok(Self {
            user_service: UserService::new(user_repository),
            movie_service: MovieService::new(movie_repository),
            genre_service: GenreService::new(genre_repository),
            session_service: SessionService::new(session_secret, session_ttl_days),
        })
    }
}
