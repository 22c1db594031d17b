//! Query composer - the ranked and annotated reads every page is built from.

use std::sync::Arc;

use crate::domain::{HydratedPost, HydratedPostDetail, Tag, TagStat};
use crate::error::DomainError;
use crate::ports::BlogStore;
use crate::query::{PostFilter, PostOrder, PostQuery, PostRelation, TagFilter, TagOrder, TagQuery};

/// Relations every post-summary record reads.
const SUMMARY_PRELOAD: &[PostRelation] = &[
    PostRelation::Author,
    PostRelation::Tags,
    PostRelation::CommentsCount,
];

/// Relations the post-detail record reads.
const DETAIL_PRELOAD: &[PostRelation] = &[
    PostRelation::Author,
    PostRelation::Tags,
    PostRelation::LikesCount,
    PostRelation::Comments,
];

/// Builds query specifications and turns store rows into hydrated entities.
#[derive(Clone)]
pub struct QueryComposer {
    store: Arc<dyn BlogStore>,
}

impl QueryComposer {
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    /// Posts ranked by like count, most liked first.
    pub async fn popular_posts(&self, limit: u64) -> Result<Vec<HydratedPost>, DomainError> {
        let query = PostQuery::new()
            .order_by(PostOrder::LikesDesc)
            .limit(limit)
            .preload(SUMMARY_PRELOAD);
        self.summaries(&query).await
    }

    /// Posts ranked by publication timestamp, newest first.
    pub async fn fresh_posts(&self, limit: u64) -> Result<Vec<HydratedPost>, DomainError> {
        let query = PostQuery::new()
            .order_by(PostOrder::PublishedDesc)
            .limit(limit)
            .preload(SUMMARY_PRELOAD);
        self.summaries(&query).await
    }

    /// Tags ranked by the number of posts carrying them.
    pub async fn popular_tags(&self, limit: u64) -> Result<Vec<TagStat>, DomainError> {
        let query = TagQuery::new()
            .order_by(TagOrder::PostsCountDesc)
            .limit(limit)
            .with_posts_count();
        self.store
            .fetch_tags(&query)
            .await?
            .into_iter()
            .map(TagStat::try_from)
            .collect()
    }

    /// Posts carrying `tag`, in natural order.
    pub async fn posts_for_tag(
        &self,
        tag: &Tag,
        limit: u64,
    ) -> Result<Vec<HydratedPost>, DomainError> {
        let query = PostQuery::new()
            .filter(PostFilter::Tag(tag.id))
            .limit(limit)
            .preload(SUMMARY_PRELOAD);
        self.summaries(&query).await
    }

    /// Look a tag up by its title.
    pub async fn find_tag(&self, title: &str) -> Result<Option<Tag>, DomainError> {
        let query = TagQuery::new()
            .filter(TagFilter::Title(title.to_string()))
            .limit(1);
        let tags = self.store.fetch_tags(&query).await?;
        Ok(tags.into_iter().next().map(|row| row.tag))
    }

    /// Look a post up by its slug, with everything the detail page shows.
    pub async fn find_post(&self, slug: &str) -> Result<Option<HydratedPostDetail>, DomainError> {
        let query = PostQuery::new()
            .filter(PostFilter::Slug(slug.to_string()))
            .limit(1)
            .preload(DETAIL_PRELOAD);
        match self.store.fetch_posts(&query).await?.into_iter().next() {
            Some(row) => Ok(Some(HydratedPostDetail::try_from(row)?)),
            None => Ok(None),
        }
    }

    async fn summaries(&self, query: &PostQuery) -> Result<Vec<HydratedPost>, DomainError> {
        let rows = self.store.fetch_posts(query).await?;
        tracing::debug!(order = ?query.order, rows = rows.len(), "Fetched posts");
        rows.into_iter().map(HydratedPost::try_from).collect()
    }
}
