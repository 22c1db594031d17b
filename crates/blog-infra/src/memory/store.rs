//! In-memory blog store - used when no database is configured, and in tests.

use std::cmp::Reverse;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{Comment, CommentWithAuthor, Post, PostRow, Tag, TagRow, TagStat, User};
use blog_core::error::RepoError;
use blog_core::ports::BlogStore;
use blog_core::query::{PostFilter, PostOrder, PostQuery, PostRelation, TagFilter, TagOrder, TagQuery};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
    tags: Vec<Tag>,
    comments: Vec<Comment>,
    /// (post_id, tag_id)
    post_tags: Vec<(Uuid, Uuid)>,
    /// (post_id, user_id)
    likes: Vec<(Uuid, Uuid)>,
}

impl Tables {
    fn likes_count(&self, post_id: Uuid) -> u64 {
        self.likes.iter().filter(|(post, _)| *post == post_id).count() as u64
    }

    fn posts_count(&self, tag_id: Uuid) -> u64 {
        self.post_tags.iter().filter(|(_, tag)| *tag == tag_id).count() as u64
    }

    fn comments_count(&self, post_id: Uuid) -> u64 {
        self.comments.iter().filter(|c| c.post_id == post_id).count() as u64
    }

    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn tag_stat(&self, tag: &Tag) -> TagStat {
        TagStat {
            tag: tag.clone(),
            posts_count: self.posts_count(tag.id),
        }
    }

    fn tags_of(&self, post_id: Uuid) -> Vec<TagStat> {
        let mut tags: Vec<TagStat> = self
            .post_tags
            .iter()
            .filter(|(post, _)| *post == post_id)
            .filter_map(|(_, tag_id)| self.tags.iter().find(|t| t.id == *tag_id))
            .map(|tag| self.tag_stat(tag))
            .collect();
        tags.sort_by(|a, b| a.tag.title.cmp(&b.tag.title));
        tags
    }

    fn comments_of(&self, post_id: Uuid) -> Vec<CommentWithAuthor> {
        let mut comments: Vec<CommentWithAuthor> = self
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .filter_map(|c| {
                self.user(c.author_id).map(|author| CommentWithAuthor {
                    comment: c.clone(),
                    author: author.clone(),
                })
            })
            .collect();
        comments.sort_by_key(|entry| entry.comment.published_at);
        comments
    }

    fn has_tag(&self, post_id: Uuid, tag_id: Uuid) -> bool {
        self.post_tags.contains(&(post_id, tag_id))
    }
}

/// In-memory store using plain vectors behind an async RwLock.
///
/// Note: Data is lost on process restart.
pub struct InMemoryBlogStore {
    tables: RwLock<Tables>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    pub async fn insert_user(&self, user: User) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        tables.users.push(user);
        Ok(())
    }

    pub async fn insert_post(&self, post: Post) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.iter().any(|p| p.slug == post.slug) {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already exists",
                post.slug
            )));
        }
        tables.posts.push(post);
        Ok(())
    }

    pub async fn insert_tag(&self, tag: Tag) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.tags.iter().any(|t| t.title == tag.title) {
            return Err(RepoError::Constraint(format!(
                "tag '{}' already exists",
                tag.title
            )));
        }
        tables.tags.push(tag);
        Ok(())
    }

    pub async fn insert_comment(&self, comment: Comment) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.iter().any(|p| p.id == comment.post_id) {
            return Err(RepoError::NotFound);
        }
        tables.comments.push(comment);
        Ok(())
    }

    /// Attach a tag to a post. Attaching twice is a no-op.
    pub async fn tag_post(&self, post_id: Uuid, tag_id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.iter().any(|p| p.id == post_id) || !tables.tags.iter().any(|t| t.id == tag_id)
        {
            return Err(RepoError::NotFound);
        }
        if !tables.has_tag(post_id, tag_id) {
            tables.post_tags.push((post_id, tag_id));
        }
        Ok(())
    }

    /// Record that `user_id` likes `post_id`. Liking twice is a no-op.
    pub async fn like_post(&self, post_id: Uuid, user_id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.iter().any(|p| p.id == post_id) || tables.user(user_id).is_none() {
            return Err(RepoError::NotFound);
        }
        if !tables.likes.contains(&(post_id, user_id)) {
            tables.likes.push((post_id, user_id));
        }
        Ok(())
    }
}

impl Default for InMemoryBlogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlogStore for InMemoryBlogStore {
    async fn fetch_posts(&self, query: &PostQuery) -> Result<Vec<PostRow>, RepoError> {
        let tables = self.tables.read().await;

        let mut posts: Vec<&Post> = tables
            .posts
            .iter()
            .filter(|post| match &query.filter {
                PostFilter::All => true,
                PostFilter::Slug(slug) => post.slug == *slug,
                PostFilter::Tag(tag_id) => tables.has_tag(post.id, *tag_id),
            })
            .collect();

        // Natural order first; the stable sort below keeps it for ties.
        posts.sort_by_key(|post| Reverse(post.published_at));
        match query.order {
            PostOrder::LikesDesc => {
                posts.sort_by_cached_key(|post| Reverse(tables.likes_count(post.id)))
            }
            PostOrder::PublishedDesc | PostOrder::Natural => {}
        }
        if let Some(limit) = query.limit {
            posts.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }

        Ok(posts
            .into_iter()
            .map(|post| PostRow {
                author: query
                    .preloads(PostRelation::Author)
                    .then(|| tables.user(post.author_id).cloned())
                    .flatten(),
                tags: query
                    .preloads(PostRelation::Tags)
                    .then(|| tables.tags_of(post.id)),
                comments_count: query
                    .preloads(PostRelation::CommentsCount)
                    .then(|| tables.comments_count(post.id)),
                likes_count: query
                    .preloads(PostRelation::LikesCount)
                    .then(|| tables.likes_count(post.id)),
                comments: query
                    .preloads(PostRelation::Comments)
                    .then(|| tables.comments_of(post.id)),
                post: post.clone(),
            })
            .collect())
    }

    async fn fetch_tags(&self, query: &TagQuery) -> Result<Vec<TagRow>, RepoError> {
        let tables = self.tables.read().await;

        let mut tags: Vec<&Tag> = tables
            .tags
            .iter()
            .filter(|tag| match &query.filter {
                TagFilter::All => true,
                TagFilter::Title(title) => tag.title == *title,
            })
            .collect();

        tags.sort_by(|a, b| a.title.cmp(&b.title));
        if query.order == TagOrder::PostsCountDesc {
            tags.sort_by_cached_key(|tag| Reverse(tables.posts_count(tag.id)));
        }
        if let Some(limit) = query.limit {
            tags.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }

        Ok(tags
            .into_iter()
            .map(|tag| TagRow {
                tag: tag.clone(),
                posts_count: query.with_posts_count.then(|| tables.posts_count(tag.id)),
            })
            .collect())
    }
}
