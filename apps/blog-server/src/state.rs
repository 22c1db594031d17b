//! Application state - shared across all handlers.

use std::sync::Arc;

use anyhow::Context;
use blog_core::ports::{BlogStore, PageRenderer};
use blog_core::{PageAssembler, QueryComposer, ViewSerializer};
use blog_infra::database::DatabaseConfig;
use blog_infra::{InMemoryBlogStore, TemplateRenderer};

#[cfg(feature = "postgres")]
use blog_infra::{DatabaseConnections, PostgresBlogStore};

use crate::config::AppConfig;

/// Which store serves the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Postgres => "postgres",
            StoreBackend::Memory => "memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pages: PageAssembler,
    pub renderer: Arc<dyn PageRenderer>,
    pub backend: StoreBackend,
}

impl AppState {
    /// Build the application state from configuration.
    ///
    /// A missing or unreachable database falls back to an empty in-memory
    /// store; missing templates are fatal.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let renderer = TemplateRenderer::from_dir(&config.templates_dir).with_context(|| {
            format!("loading templates from {}", config.templates_dir.display())
        })?;
        let (backend, store) = Self::connect(config.database.as_ref()).await;

        tracing::info!(backend = backend.as_str(), "Application state initialized");

        let mut state = Self::from_parts(store, Arc::new(renderer), &config.media_url);
        state.backend = backend;
        Ok(state)
    }

    /// Assemble state around an already-built store and renderer.
    pub fn from_parts(
        store: Arc<dyn BlogStore>,
        renderer: Arc<dyn PageRenderer>,
        media_url: &str,
    ) -> Self {
        Self {
            pages: PageAssembler::new(QueryComposer::new(store), ViewSerializer::new(media_url)),
            renderer,
            backend: StoreBackend::Memory,
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect(db_config: Option<&DatabaseConfig>) -> (StoreBackend, Arc<dyn BlogStore>) {
        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return (StoreBackend::Memory, Arc::new(InMemoryBlogStore::new()));
        };

        match DatabaseConnections::init(config).await {
            Ok(connections) => (
                StoreBackend::Postgres,
                Arc::new(PostgresBlogStore::new(connections.main)),
            ),
            Err(e) => {
                tracing::error!("{}. Using in-memory fallback.", e);
                (StoreBackend::Memory, Arc::new(InMemoryBlogStore::new()))
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(_db_config: Option<&DatabaseConfig>) -> (StoreBackend, Arc<dyn BlogStore>) {
        tracing::info!("Running without postgres feature - using in-memory store");
        (StoreBackend::Memory, Arc::new(InMemoryBlogStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_without_database_url_serves_memory_store() {
        let (backend, store) = AppState::connect(None).await;
        assert_eq!(backend, StoreBackend::Memory);

        let renderer = TemplateRenderer::from_sources(Vec::new()).unwrap();
        let state = AppState::from_parts(store, Arc::new(renderer), "/media/");
        let page = state.pages.index().await.unwrap();
        assert!(page.page_posts.is_empty());
        assert_eq!(state.backend.as_str(), "memory");
    }
}
