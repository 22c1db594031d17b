use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - a post or comment author, or a liker.
///
/// The read path only ever needs the display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
}

impl User {
    /// Create a new user with a generated ID.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
        }
    }
}
