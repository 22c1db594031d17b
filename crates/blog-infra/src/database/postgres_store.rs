//! PostgreSQL implementation of the blog store.
//!
//! Rankings are computed in SQL (`COUNT` + `GROUP BY`). Relations named in a
//! query's preload list are fetched with one batched query each, keyed by the
//! ids of the page of posts, never row by row.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, Order, Query};
use sea_orm::{
    ColumnTrait, DbConn, DbErr, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use blog_core::domain::{CommentWithAuthor, Post, PostRow, Tag, TagRow, TagStat, User};
use blog_core::error::RepoError;
use blog_core::ports::BlogStore;
use blog_core::query::{PostFilter, PostOrder, PostQuery, PostRelation, TagFilter, TagOrder, TagQuery};

use super::entity::{comment, post, post_like, post_tag, tag, user};

const LIKES_COUNT: &str = "likes_count";
const POSTS_COUNT: &str = "posts_count";

#[derive(Debug, FromQueryResult)]
struct PostWithLikes {
    id: Uuid,
    author_id: Uuid,
    title: String,
    text: String,
    slug: String,
    image: Option<String>,
    published_at: DateTimeWithTimeZone,
    likes_count: i64,
}

impl From<PostWithLikes> for Post {
    fn from(row: PostWithLikes) -> Self {
        Self {
            id: row.id,
            author_id: row.author_id,
            title: row.title,
            text: row.text,
            slug: row.slug,
            image: row.image,
            published_at: row.published_at.into(),
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct TagWithCount {
    id: Uuid,
    title: String,
    posts_count: i64,
}

impl From<TagWithCount> for TagStat {
    fn from(row: TagWithCount) -> Self {
        Self {
            tag: Tag {
                id: row.id,
                title: row.title,
            },
            posts_count: row.posts_count.max(0) as u64,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct CommentCount {
    post_id: Uuid,
    count: i64,
}

fn query_error(err: DbErr) -> RepoError {
    RepoError::Query(err.to_string())
}

/// PostgreSQL blog store.
pub struct PostgresBlogStore {
    pub(crate) db: DbConn,
}

impl PostgresBlogStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Posts with their like count, filtered, ordered and limited.
    fn post_select(query: &PostQuery) -> Select<post::Entity> {
        let mut select = post::Entity::find()
            .column_as(
                Expr::col((post_like::Entity, post_like::Column::UserId)).count(),
                LIKES_COUNT,
            )
            .join(JoinType::LeftJoin, post::Relation::PostLike.def())
            .group_by(post::Column::Id);

        select = match &query.filter {
            PostFilter::All => select,
            PostFilter::Slug(slug) => select.filter(post::Column::Slug.eq(slug.as_str())),
            PostFilter::Tag(tag_id) => select.filter(
                post::Column::Id.in_subquery(
                    Query::select()
                        .column(post_tag::Column::PostId)
                        .from(post_tag::Entity)
                        .and_where(post_tag::Column::TagId.eq(*tag_id))
                        .to_owned(),
                ),
            ),
        };

        match query.order {
            PostOrder::LikesDesc => {
                select = select.order_by(Expr::cust(LIKES_COUNT), Order::Desc);
            }
            PostOrder::PublishedDesc | PostOrder::Natural => {}
        }
        select = select
            .order_by_desc(post::Column::PublishedAt)
            .order_by_asc(post::Column::Id);

        if let Some(limit) = query.limit {
            select = select.limit(limit);
        }
        select
    }

    async fn authors(&self, ids: Vec<Uuid>) -> Result<HashMap<Uuid, User>, RepoError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let users = user::Entity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(users
            .into_iter()
            .map(|model| (model.id, User::from(model)))
            .collect())
    }

    /// Tags of each post, each tag annotated with its total post count.
    async fn tags_by_post(
        &self,
        post_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<TagStat>>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let links = post_tag::Entity::find()
            .filter(post_tag::Column::PostId.is_in(post_ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        let mut tag_ids: Vec<Uuid> = links.iter().map(|link| link.tag_id).collect();
        tag_ids.sort();
        tag_ids.dedup();
        if tag_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let stats: HashMap<Uuid, TagStat> = Self::counted_tags(tag::Entity::find())
            .filter(tag::Column::Id.is_in(tag_ids))
            .into_model::<TagWithCount>()
            .all(&self.db)
            .await
            .map_err(query_error)?
            .into_iter()
            .map(|row| (row.id, TagStat::from(row)))
            .collect();

        let mut by_post: HashMap<Uuid, Vec<TagStat>> = HashMap::new();
        for link in links {
            if let Some(stat) = stats.get(&link.tag_id) {
                by_post.entry(link.post_id).or_default().push(stat.clone());
            }
        }
        for tags in by_post.values_mut() {
            tags.sort_by(|a, b| a.tag.title.cmp(&b.tag.title));
        }
        Ok(by_post)
    }

    async fn comment_counts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let counts = comment::Entity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(Expr::col(comment::Column::Id).count(), "count")
            .filter(comment::Column::PostId.is_in(post_ids.to_vec()))
            .group_by(comment::Column::PostId)
            .into_model::<CommentCount>()
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(counts
            .into_iter()
            .map(|row| (row.post_id, row.count.max(0) as u64))
            .collect())
    }

    async fn comments_by_post(
        &self,
        post_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<CommentWithAuthor>>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let comments = comment::Entity::find()
            .filter(comment::Column::PostId.is_in(post_ids.to_vec()))
            .order_by_asc(comment::Column::PublishedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        let authors = self
            .authors(comments.iter().map(|c| c.author_id).collect())
            .await?;

        let mut by_post: HashMap<Uuid, Vec<CommentWithAuthor>> = HashMap::new();
        for model in comments {
            let Some(author) = authors.get(&model.author_id) else {
                tracing::warn!(comment_id = %model.id, "Comment author missing, skipping");
                continue;
            };
            by_post
                .entry(model.post_id)
                .or_default()
                .push(CommentWithAuthor {
                    author: author.clone(),
                    comment: model.into(),
                });
        }
        Ok(by_post)
    }

    /// Adds a `posts_count` column to a tag select.
    fn counted_tags(select: Select<tag::Entity>) -> Select<tag::Entity> {
        select
            .column_as(
                Expr::col((post_tag::Entity, post_tag::Column::PostId)).count(),
                POSTS_COUNT,
            )
            .join(JoinType::LeftJoin, tag::Relation::PostTag.def())
            .group_by(tag::Column::Id)
    }
}

#[async_trait]
impl BlogStore for PostgresBlogStore {
    async fn fetch_posts(&self, query: &PostQuery) -> Result<Vec<PostRow>, RepoError> {
        let rows = Self::post_select(query)
            .into_model::<PostWithLikes>()
            .all(&self.db)
            .await
            .map_err(query_error)?;

        tracing::debug!(filter = ?query.filter, rows = rows.len(), "Fetched posts");
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let post_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

        let authors = if query.preloads(PostRelation::Author) {
            Some(self.authors(rows.iter().map(|row| row.author_id).collect()).await?)
        } else {
            None
        };
        let mut tags = if query.preloads(PostRelation::Tags) {
            Some(self.tags_by_post(&post_ids).await?)
        } else {
            None
        };
        let comment_counts = if query.preloads(PostRelation::CommentsCount) {
            Some(self.comment_counts(&post_ids).await?)
        } else {
            None
        };
        let mut comments = if query.preloads(PostRelation::Comments) {
            Some(self.comments_by_post(&post_ids).await?)
        } else {
            None
        };
        let with_likes = query.preloads(PostRelation::LikesCount);

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = row.id;
                let author_id = row.author_id;
                let likes = row.likes_count.max(0) as u64;
                PostRow {
                    author: authors.as_ref().and_then(|map| map.get(&author_id).cloned()),
                    tags: tags
                        .as_mut()
                        .map(|map| map.remove(&id).unwrap_or_default()),
                    comments_count: comment_counts
                        .as_ref()
                        .map(|map| map.get(&id).copied().unwrap_or(0)),
                    likes_count: with_likes.then_some(likes),
                    comments: comments
                        .as_mut()
                        .map(|map| map.remove(&id).unwrap_or_default()),
                    post: row.into(),
                }
            })
            .collect())
    }

    async fn fetch_tags(&self, query: &TagQuery) -> Result<Vec<TagRow>, RepoError> {
        let mut select = tag::Entity::find();
        if let TagFilter::Title(title) = &query.filter {
            select = select.filter(tag::Column::Title.eq(title.as_str()));
        }

        let counted = query.with_posts_count || query.order == TagOrder::PostsCountDesc;
        if counted {
            select = Self::counted_tags(select);
        }
        if query.order == TagOrder::PostsCountDesc {
            select = select.order_by(Expr::cust(POSTS_COUNT), Order::Desc);
        }
        select = select.order_by_asc(tag::Column::Title);
        if let Some(limit) = query.limit {
            select = select.limit(limit);
        }

        if counted {
            let rows = select
                .into_model::<TagWithCount>()
                .all(&self.db)
                .await
                .map_err(query_error)?;
            Ok(rows
                .into_iter()
                .map(|row| {
                    let stat = TagStat::from(row);
                    TagRow {
                        tag: stat.tag,
                        posts_count: query.with_posts_count.then_some(stat.posts_count),
                    }
                })
                .collect())
        } else {
            let models = select.all(&self.db).await.map_err(query_error)?;
            Ok(models
                .into_iter()
                .map(|model| TagRow {
                    tag: model.into(),
                    posts_count: None,
                })
                .collect())
        }
    }
}
