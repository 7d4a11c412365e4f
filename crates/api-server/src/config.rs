use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_host: String,
    pub api_port: u16,
    pub database_url: String,
    pub session_secret: String,
    pub session_ttl_days: i64,
    pub store_timeout_ms: u64,
    pub upload_dir: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Config {
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:catalog.db".to_string()),

            session_secret: env::var("SESSION_SECRET")
                .unwrap_or_else(|_| "change-me-in-production".to_string()),

            session_ttl_days: env::var("SESSION_TTL_DAYS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),

            store_timeout_ms: env::var("STORE_TIMEOUT_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),

            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),

            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        }
    }

    pub fn store_deadline(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}
