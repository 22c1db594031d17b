use async_trait::async_trait;

use crate::domain::{PostRow, TagRow};
use crate::error::RepoError;
use crate::query::{PostQuery, TagQuery};

/// Read access to the blog's entity store.
///
/// Implementations must honor every part of the query: filter, ordering
/// (with ties broken by the natural order), limit, and the preload list.
/// Relations not named in the preload list are left as `None`.
#[async_trait]
pub trait BlogStore: Send + Sync {
    /// Fetch posts matching the query. Returns an empty vector when nothing matches.
    async fn fetch_posts(&self, query: &PostQuery) -> Result<Vec<PostRow>, RepoError>;

    /// Fetch tags matching the query. Returns an empty vector when nothing matches.
    async fn fetch_tags(&self, query: &TagQuery) -> Result<Vec<TagRow>, RepoError>;
}
