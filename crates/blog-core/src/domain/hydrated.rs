//! Reference-shaped rows returned by stores, and the hydrated shapes the
//! view serializer accepts.
//!
//! A store fills only the relations a query asked it to preload. Converting a
//! [`PostRow`] into a hydrated shape checks that every relation the serializer
//! reads is present, so serialization never has to go back to the store.

use crate::error::DomainError;

use super::{CommentWithAuthor, Post, Tag, TagStat, User};

/// A post as fetched, with optional preloaded relations.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRow {
    pub post: Post,
    pub author: Option<User>,
    pub tags: Option<Vec<TagStat>>,
    pub comments_count: Option<u64>,
    pub likes_count: Option<u64>,
    pub comments: Option<Vec<CommentWithAuthor>>,
}

impl PostRow {
    /// A row with no relations loaded.
    pub fn bare(post: Post) -> Self {
        Self {
            post,
            author: None,
            tags: None,
            comments_count: None,
            likes_count: None,
            comments: None,
        }
    }
}

/// A tag as fetched, optionally annotated with its post count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRow {
    pub tag: Tag,
    pub posts_count: Option<u64>,
}

/// Everything a post-summary record needs.
#[derive(Debug, Clone, PartialEq)]
pub struct HydratedPost {
    pub post: Post,
    pub author: User,
    pub tags: Vec<TagStat>,
    pub comments_count: u64,
}

/// Everything a post-detail record needs.
#[derive(Debug, Clone, PartialEq)]
pub struct HydratedPostDetail {
    pub post: Post,
    pub author: User,
    pub tags: Vec<TagStat>,
    pub likes_count: u64,
    pub comments: Vec<CommentWithAuthor>,
}

fn required<T>(value: Option<T>, relation: &'static str) -> Result<T, DomainError> {
    value.ok_or(DomainError::RelationNotLoaded {
        entity_type: "Post",
        relation,
    })
}

impl TryFrom<PostRow> for HydratedPost {
    type Error = DomainError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Self {
            author: required(row.author, "author")?,
            tags: required(row.tags, "tags")?,
            comments_count: required(row.comments_count, "comments_count")?,
            post: row.post,
        })
    }
}

impl TryFrom<PostRow> for HydratedPostDetail {
    type Error = DomainError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Self {
            author: required(row.author, "author")?,
            tags: required(row.tags, "tags")?,
            likes_count: required(row.likes_count, "likes_count")?,
            comments: required(row.comments, "comments")?,
            post: row.post,
        })
    }
}

impl TryFrom<TagRow> for TagStat {
    type Error = DomainError;

    fn try_from(row: TagRow) -> Result<Self, Self::Error> {
        let posts_count = row.posts_count.ok_or(DomainError::RelationNotLoaded {
            entity_type: "Tag",
            relation: "posts_count",
        })?;
        Ok(Self {
            tag: row.tag,
            posts_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> PostRow {
        let author = User::new("alice");
        let post = Post::new(author.id, "Title", "Body", "title");
        PostRow {
            author: Some(author),
            tags: Some(vec![]),
            comments_count: Some(2),
            ..PostRow::bare(post)
        }
    }

    #[test]
    fn test_hydrate_summary() {
        let hydrated = HydratedPost::try_from(sample_row()).unwrap();
        assert_eq!(hydrated.author.username, "alice");
        assert_eq!(hydrated.comments_count, 2);
    }

    #[test]
    fn test_hydrate_summary_without_author_fails() {
        let row = PostRow {
            author: None,
            ..sample_row()
        };
        let err = HydratedPost::try_from(row).unwrap_err();
        assert!(matches!(
            err,
            DomainError::RelationNotLoaded {
                relation: "author",
                ..
            }
        ));
    }

    #[test]
    fn test_hydrate_detail_requires_comments() {
        let row = PostRow {
            likes_count: Some(1),
            ..sample_row()
        };
        let err = HydratedPostDetail::try_from(row).unwrap_err();
        assert!(matches!(
            err,
            DomainError::RelationNotLoaded {
                relation: "comments",
                ..
            }
        ));
    }

    #[test]
    fn test_tag_without_count_fails() {
        let row = TagRow {
            tag: Tag::new("rust"),
            posts_count: None,
        };
        assert!(TagStat::try_from(row).is_err());
    }
}
