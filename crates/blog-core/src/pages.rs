//! Page assemblers - one stateless method per page.
//!
//! Each page issues its independent reads concurrently and hands back a
//! serialized context ready for a [`PageRenderer`](crate::ports::PageRenderer).

use ramhorns::Content;
use serde::{Deserialize, Serialize};

use crate::composer::QueryComposer;
use crate::domain::HydratedPost;
use crate::error::DomainError;
use crate::view::{PostDetail, PostSummary, TagSummary, ViewSerializer};

/// Sidebar and index list sizes.
pub const POPULAR_POSTS_LIMIT: u64 = 5;
pub const FRESH_POSTS_LIMIT: u64 = 5;
pub const POPULAR_TAGS_LIMIT: u64 = 5;
/// Posts shown on a tag listing.
pub const TAG_POSTS_LIMIT: u64 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Content)]
pub struct IndexPage {
    pub most_popular_posts: Vec<PostSummary>,
    pub page_posts: Vec<PostSummary>,
    pub popular_tags: Vec<TagSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Content)]
pub struct PostDetailsPage {
    pub post: PostDetail,
    pub popular_tags: Vec<TagSummary>,
    pub most_popular_posts: Vec<PostSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Content)]
pub struct PostsListPage {
    pub tag: String,
    pub posts: Vec<PostSummary>,
    pub popular_tags: Vec<TagSummary>,
    pub most_popular_posts: Vec<PostSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Content)]
pub struct ContactsPage {}

/// An assembled page, tagged with the template that renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Page {
    Index(IndexPage),
    PostDetails(PostDetailsPage),
    PostsList(PostsListPage),
    Contacts(ContactsPage),
}

impl Page {
    pub const TEMPLATES: [&'static str; 4] = ["index", "post-details", "posts-list", "contacts"];

    pub fn template_name(&self) -> &'static str {
        match self {
            Page::Index(_) => "index",
            Page::PostDetails(_) => "post-details",
            Page::PostsList(_) => "posts-list",
            Page::Contacts(_) => "contacts",
        }
    }
}

/// Composes queries and serializes their results into page contexts.
#[derive(Clone)]
pub struct PageAssembler {
    composer: QueryComposer,
    serializer: ViewSerializer,
}

impl PageAssembler {
    pub fn new(composer: QueryComposer, serializer: ViewSerializer) -> Self {
        Self {
            composer,
            serializer,
        }
    }

    /// Home page: most liked posts, newest posts, popular tags.
    pub async fn index(&self) -> Result<IndexPage, DomainError> {
        let (popular, fresh, tags) = futures::try_join!(
            self.composer.popular_posts(POPULAR_POSTS_LIMIT),
            self.composer.fresh_posts(FRESH_POSTS_LIMIT),
            self.composer.popular_tags(POPULAR_TAGS_LIMIT),
        )?;

        Ok(IndexPage {
            most_popular_posts: self.summaries(popular),
            page_posts: self.summaries(fresh),
            popular_tags: tags.into_iter().map(ViewSerializer::tag_summary).collect(),
        })
    }

    /// Detail page for the post with `slug`.
    pub async fn post_detail(&self, slug: &str) -> Result<PostDetailsPage, DomainError> {
        let (post, tags, popular) = futures::try_join!(
            self.composer.find_post(slug),
            self.composer.popular_tags(POPULAR_TAGS_LIMIT),
            self.composer.popular_posts(POPULAR_POSTS_LIMIT),
        )?;
        let post = post.ok_or_else(|| {
            tracing::debug!(slug, "Post not found");
            DomainError::not_found("Post", slug)
        })?;

        Ok(PostDetailsPage {
            post: self.serializer.post_detail(post),
            popular_tags: tags.into_iter().map(ViewSerializer::tag_summary).collect(),
            most_popular_posts: self.summaries(popular),
        })
    }

    /// Listing of the posts carrying the tag titled `tag_title`.
    pub async fn tag_filter(&self, tag_title: &str) -> Result<PostsListPage, DomainError> {
        let tag = self.composer.find_tag(tag_title).await?.ok_or_else(|| {
            tracing::debug!(tag_title, "Tag not found");
            DomainError::not_found("Tag", tag_title)
        })?;

        let (posts, tags, popular) = futures::try_join!(
            self.composer.posts_for_tag(&tag, TAG_POSTS_LIMIT),
            self.composer.popular_tags(POPULAR_TAGS_LIMIT),
            self.composer.popular_posts(POPULAR_POSTS_LIMIT),
        )?;

        Ok(PostsListPage {
            tag: tag.title,
            posts: self.summaries(posts),
            popular_tags: tags.into_iter().map(ViewSerializer::tag_summary).collect(),
            most_popular_posts: self.summaries(popular),
        })
    }

    /// Static contacts page.
    pub fn contacts(&self) -> ContactsPage {
        ContactsPage::default()
    }

    fn summaries(&self, posts: Vec<HydratedPost>) -> Vec<PostSummary> {
        posts
            .into_iter()
            .map(|post| self.serializer.post_summary(post))
            .collect()
    }
}
