//! # Blog Core
//!
//! The domain layer of the blog.
//! Query composition, view serialization and page assembly live here;
//! storage and template rendering are reached through the traits in [`ports`].

pub mod composer;
pub mod domain;
pub mod error;
pub mod pages;
pub mod ports;
pub mod query;
pub mod view;

pub use composer::QueryComposer;
pub use error::{DomainError, RepoError};
pub use pages::{Page, PageAssembler};
pub use view::ViewSerializer;
