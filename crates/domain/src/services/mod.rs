pub mod genre_service;
pub mod movie_service;
pub mod session_service;
pub mod user_service;

pub use genre_service::GenreService;
pub use movie_service::{MovieService, MovieUpdate, NewMovie};
pub use session_service::SessionService;
pub use user_service::{ProfileUpdate, UserService};
