//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use blog_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Prefix joined with a post's image path to build its URL.
    pub media_url: String,
    pub templates_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed_var("DB_MAX_CONNECTIONS", 100),
            min_connections: parsed_var("DB_MIN_CONNECTIONS", 10),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed_var("PORT", 8080),
            database,
            media_url: env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".to_string()),
            templates_dir: env::var("TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("templates")),
        }
    }
}

fn parsed_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
