//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//! This crate contains the store adapters and the template renderer.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL store via SeaORM

pub mod database;
pub mod memory;
pub mod render;

// Re-exports
pub use memory::InMemoryBlogStore;
pub use render::TemplateRenderer;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConnections, PostgresBlogStore};
