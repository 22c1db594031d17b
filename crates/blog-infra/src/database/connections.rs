#[cfg(feature = "postgres")]
use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn};

#[cfg(feature = "postgres")]
use blog_core::error::RepoError;

/// Configuration for the blog database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Pooled connection to the blog database.
///
/// # Example
/// ```ignore
/// let db = DatabaseConnections::init(&config).await?;
/// let store = PostgresBlogStore::new(db.main);
/// ```
#[cfg(feature = "postgres")]
pub struct DatabaseConnections {
    pub main: DbConn,
}

#[cfg(feature = "postgres")]
impl DatabaseConnections {
    /// Open the connection pool described by `config`.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, RepoError> {
        tracing::info!("Initializing database connections...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let main = Database::connect(opts)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        tracing::info!("Main database connected (pool: {})", config.max_connections);

        Ok(Self { main })
    }
}

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_database_is_connection_error() {
        let config = DatabaseConfig {
            url: "unsupported://localhost/blog".to_string(),
            max_connections: 1,
            min_connections: 0,
        };
        let err = DatabaseConnections::init(&config).await.err().unwrap();
        assert!(matches!(err, RepoError::Connection(_)));
    }
}
