//! View serializer - flat, template-ready records built from hydrated entities.
//!
//! Every record derives `serde` for the JSON surface and `ramhorns::Content`
//! for template rendering. The serializer only reads what hydration already
//! guaranteed to be present.

use chrono::{DateTime, Utc};
use ramhorns::Content;
use ramhorns::encoding::Encoder;
use serde::{Deserialize, Serialize};

use crate::domain::{CommentWithAuthor, HydratedPost, HydratedPostDetail, TagStat};

/// Number of characters kept in a post teaser.
pub const TEASER_LENGTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Content)]
pub struct TagSummary {
    pub title: String,
    pub posts_with_tag: u64,
    /// Link to the tag listing, title percent-encoded.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Content)]
pub struct PostSummary {
    pub title: String,
    pub teaser_text: String,
    pub author: String,
    pub comments_amount: u64,
    pub image_url: Option<String>,
    pub published_at: Timestamp,
    pub slug: String,
    pub tags: Vec<TagSummary>,
    /// Absent for posts without tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_tag_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_tag_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Content)]
pub struct CommentSummary {
    pub text: String,
    pub published_at: Timestamp,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Content)]
pub struct PostDetail {
    pub title: String,
    pub text: String,
    pub author: String,
    pub comments: Vec<CommentSummary>,
    pub likes_amount: u64,
    pub image_url: Option<String>,
    pub published_at: Timestamp,
    pub slug: String,
    pub tags: Vec<TagSummary>,
}

/// Publication time: RFC 3339 in JSON, `02 January 2024 03:04` in templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    pub fn display(&self) -> String {
        self.0.format("%d %B %Y %H:%M").to_string()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl Content for Timestamp {
    fn render_escaped<E: Encoder>(&self, encoder: &mut E) -> Result<(), E::Error> {
        encoder.write_escaped(&self.display())
    }

    fn render_unescaped<E: Encoder>(&self, encoder: &mut E) -> Result<(), E::Error> {
        encoder.write_unescaped(&self.display())
    }
}

/// Path of the listing page for the tag titled `title`.
pub fn tag_url(title: &str) -> String {
    format!("/tag/{}", urlencoding::encode(title))
}

/// First `TEASER_LENGTH` characters of `text`, cut without regard to words.
pub fn teaser(text: &str) -> String {
    text.chars().take(TEASER_LENGTH).collect()
}

/// Maps hydrated entities to presentation records.
#[derive(Debug, Clone)]
pub struct ViewSerializer {
    media_url: String,
}

impl ViewSerializer {
    /// `media_url` is the public prefix under which post images are served.
    pub fn new(media_url: impl Into<String>) -> Self {
        Self {
            media_url: media_url.into(),
        }
    }

    pub fn post_summary(&self, hydrated: HydratedPost) -> PostSummary {
        let tags: Vec<TagSummary> = hydrated.tags.into_iter().map(Self::tag_summary).collect();
        let first_tag_title = tags.first().map(|tag| tag.title.clone());
        let first_tag_url = tags.first().map(|tag| tag.url.clone());
        let post = hydrated.post;

        PostSummary {
            teaser_text: teaser(&post.text),
            author: hydrated.author.username,
            comments_amount: hydrated.comments_count,
            image_url: self.image_url(post.image.as_deref()),
            published_at: post.published_at.into(),
            title: post.title,
            slug: post.slug,
            tags,
            first_tag_title,
            first_tag_url,
        }
    }

    pub fn post_detail(&self, hydrated: HydratedPostDetail) -> PostDetail {
        let post = hydrated.post;

        PostDetail {
            image_url: self.image_url(post.image.as_deref()),
            title: post.title,
            text: post.text,
            author: hydrated.author.username,
            comments: hydrated
                .comments
                .into_iter()
                .map(Self::comment_summary)
                .collect(),
            likes_amount: hydrated.likes_count,
            published_at: post.published_at.into(),
            slug: post.slug,
            tags: hydrated.tags.into_iter().map(Self::tag_summary).collect(),
        }
    }

    pub fn tag_summary(stat: TagStat) -> TagSummary {
        TagSummary {
            url: tag_url(&stat.tag.title),
            title: stat.tag.title,
            posts_with_tag: stat.posts_count,
        }
    }

    pub fn comment_summary(entry: CommentWithAuthor) -> CommentSummary {
        CommentSummary {
            text: entry.comment.text,
            published_at: entry.comment.published_at.into(),
            author: entry.author.username,
        }
    }

    fn image_url(&self, image: Option<&str>) -> Option<String> {
        image.map(|path| {
            format!(
                "{}/{}",
                self.media_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        })
    }
}
