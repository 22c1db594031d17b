use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a published blog article.
///
/// `slug` is unique and never changes once the post is published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub slug: String,
    /// Path of the attached image, relative to the media root.
    pub image: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post published now.
    pub fn new(
        author_id: Uuid,
        title: impl Into<String>,
        text: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title: title.into(),
            text: text.into(),
            slug: slug.into(),
            image: None,
            published_at: Utc::now(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = published_at;
        self
    }
}
