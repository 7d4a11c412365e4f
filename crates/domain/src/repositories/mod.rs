pub mod genre_repository;
pub mod movie_repository;
pub mod user_repository;

pub use genre_repository::GenreRepository;
pub use movie_repository::MovieRepository;
pub use user_repository::UserRepository;
