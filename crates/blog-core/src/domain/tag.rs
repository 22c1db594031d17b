use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag entity. Titles are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub title: String,
}

impl Tag {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
        }
    }
}

/// A tag annotated with the number of posts carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagStat {
    pub tag: Tag,
    pub posts_count: u64,
}
