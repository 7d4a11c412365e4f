use application::CatalogApp;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

mod auth;
mod config;
mod error;
mod handlers;

use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<CatalogApp>,
    pub config: Arc<Config>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Accounts and sessions
        .route(
            "/api/users",
            post(handlers::users::register).get(handlers::users::list_users),
        )
        .route("/api/users/login", post(handlers::users::login))
        .route("/api/users/logout", post(handlers::users::logout))
        .route(
            "/api/users/profile",
            get(handlers::users::profile).put(handlers::users::update_profile),
        )
        // Catalog
        .route(
            "/api/movies",
            get(handlers::movies::list_movies).post(handlers::movies::create_movie),
        )
        .route("/api/movies/new", get(handlers::movies::new_movies))
        .route("/api/movies/top", get(handlers::movies::top_movies))
        .route("/api/movies/random", get(handlers::movies::random_movies))
        .route(
            "/api/movies/:id",
            get(handlers::movies::get_movie)
                .put(handlers::movies::update_movie)
                .delete(handlers::movies::delete_movie),
        )
        // Reviews (embedded in their movie)
        .route("/api/movies/:id/reviews", post(handlers::movies::add_review))
        .route(
            "/api/movies/:id/reviews/:review_id",
            delete(handlers::movies::delete_review),
        )
        // Genres
        .route(
            "/api/genres",
            get(handlers::genres::list_genres).post(handlers::genres::create_genre),
        )
        .route(
            "/api/genres/:id",
            get(handlers::genres::get_genre)
                .put(handlers::genres::update_genre)
                .delete(handlers::genres::delete_genre),
        )
        // Image pass-through
        .route("/api/uploads", post(handlers::uploads::upload_image))
        // Operational endpoints
        .route("/api/status", get(handlers::get_system_status))
        .route("/health", get(handlers::health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "api_server=debug,tower_http=info".to_string()),
        )
        .init();

    info!("🎬 Starting movie catalog API server");

    let config = Config::from_env();
    info!("💾 Using database: {}", config.database_url);

    let app = Arc::new(
        CatalogApp::new(
            &config.database_url,
            &config.session_secret,
            config.session_ttl_days,
            config.store_deadline(),
        )
        .await?,
    );

    // Bootstrap admin account, if configured
    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        let admin = app
            .user_service
            .ensure_admin("admin".to_string(), email.clone(), password.clone())
            .await?;
        info!("👤 Admin account ready: {}", admin.email);
    }

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let bind_address = format!("{}:{}", config.api_host, config.api_port);
    let state = AppState {
        app,
        config: Arc::new(config),
    };
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("🌐 API server listening on http://{}", bind_address);

    axum::serve(listener, router).await?;

    Ok(())
}
