//! Domain entities - the core business objects.

mod comment;
mod hydrated;
mod post;
mod tag;
mod user;

pub use comment::{Comment, CommentWithAuthor};
pub use hydrated::{HydratedPost, HydratedPostDetail, PostRow, TagRow};
pub use post::Post;
pub use tag::{Tag, TagStat};
pub use user::User;
