//! In-memory store implementation - fallback when no database is configured.

mod store;

pub use store::InMemoryBlogStore;
