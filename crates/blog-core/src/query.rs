//! Query specification objects handed to a [`BlogStore`](crate::ports::BlogStore).
//!
//! A query names its filter, ordering, limit and the relations to preload.
//! Stores interpret these values; nothing here touches storage.

use uuid::Uuid;

/// Which posts a query selects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PostFilter {
    #[default]
    All,
    Slug(String),
    Tag(Uuid),
}

/// Post ordering. Ties always fall back to [`PostOrder::Natural`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostOrder {
    /// Publication timestamp, newest first.
    #[default]
    Natural,
    LikesDesc,
    PublishedDesc,
}

/// Relations of a post that a store can load alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostRelation {
    Author,
    /// Tags, each annotated with its post count.
    Tags,
    CommentsCount,
    LikesCount,
    /// Full comment list with comment authors.
    Comments,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostQuery {
    pub filter: PostFilter,
    pub order: PostOrder,
    pub limit: Option<u64>,
    pub preload: Vec<PostRelation>,
}

impl PostQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: PostFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, order: PostOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn preload(mut self, relations: &[PostRelation]) -> Self {
        for relation in relations {
            if !self.preload.contains(relation) {
                self.preload.push(*relation);
            }
        }
        self
    }

    pub fn preloads(&self, relation: PostRelation) -> bool {
        self.preload.contains(&relation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    #[default]
    All,
    Title(String),
}

/// Tag ordering. Ties fall back to [`TagOrder::Natural`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagOrder {
    /// Title, ascending.
    #[default]
    Natural,
    PostsCountDesc,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagQuery {
    pub filter: TagFilter,
    pub order: TagOrder,
    pub limit: Option<u64>,
    pub with_posts_count: bool,
}

impl TagQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: TagFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, order: TagOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_posts_count(mut self) -> Self {
        self.with_posts_count = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preload_deduplicates() {
        let query = PostQuery::new()
            .preload(&[PostRelation::Author, PostRelation::Tags])
            .preload(&[PostRelation::Author]);
        assert_eq!(query.preload.len(), 2);
        assert!(query.preloads(PostRelation::Tags));
        assert!(!query.preloads(PostRelation::Comments));
    }

    #[test]
    fn test_defaults() {
        let query = TagQuery::new();
        assert_eq!(query.filter, TagFilter::All);
        assert_eq!(query.order, TagOrder::Natural);
        assert_eq!(query.limit, None);
        assert!(!query.with_posts_count);
    }
}
