//! Page assembly over the in-memory store.

use std::sync::Arc;

use chrono::{Duration, Utc};

use blog_core::domain::{Comment, Post, Tag, User};
use blog_core::{DomainError, PageAssembler, QueryComposer, ViewSerializer};
use blog_infra::InMemoryBlogStore;

struct Fixture {
    store: Arc<InMemoryBlogStore>,
    pages: PageAssembler,
    author: User,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(InMemoryBlogStore::new());
        let composer = QueryComposer::new(store.clone());
        let pages = PageAssembler::new(composer, ViewSerializer::new("/media/"));
        Self {
            store,
            pages,
            author: User::new("author"),
        }
    }

    async fn with_author(self) -> Self {
        self.store.insert_user(self.author.clone()).await.unwrap();
        self
    }

    /// Insert a post published `age_hours` ago with `likes` distinct likers.
    async fn post(&self, slug: &str, age_hours: i64, likes: usize) -> Post {
        let post = Post::new(self.author.id, slug.to_uppercase(), "x".repeat(250), slug)
            .published_at(Utc::now() - Duration::hours(age_hours));
        self.store.insert_post(post.clone()).await.unwrap();
        for i in 0..likes {
            let fan = User::new(format!("{slug}-fan-{i}"));
            self.store.insert_user(fan.clone()).await.unwrap();
            self.store.like_post(post.id, fan.id).await.unwrap();
        }
        post
    }

    async fn tag(&self, title: &str, posts: &[&Post]) -> Tag {
        let tag = Tag::new(title);
        self.store.insert_tag(tag.clone()).await.unwrap();
        for post in posts {
            self.store.tag_post(post.id, tag.id).await.unwrap();
        }
        tag
    }
}

#[tokio::test]
async fn test_index_on_empty_store() {
    let fixture = Fixture::new().with_author().await;
    let page = fixture.pages.index().await.unwrap();

    assert!(page.most_popular_posts.is_empty());
    assert!(page.page_posts.is_empty());
    assert!(page.popular_tags.is_empty());
}

#[tokio::test]
async fn test_index_rankings() {
    let fixture = Fixture::new().with_author().await;
    let a = fixture.post("a", 3, 3).await;
    let b = fixture.post("b", 2, 1).await;
    let c = fixture.post("c", 1, 5).await;
    for i in 0..5 {
        fixture.post(&format!("old-{i}"), 100 + i, 0).await;
    }
    fixture.tag("rust", &[&a, &b, &c]).await;
    fixture.tag("web", &[&a]).await;

    let page = fixture.pages.index().await.unwrap();

    let popular: Vec<_> = page.most_popular_posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(popular.len(), 5);
    assert_eq!(&popular[..3], ["c", "a", "b"]);

    let fresh: Vec<_> = page.page_posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(fresh, ["c", "b", "a", "old-0", "old-1"]);

    assert_eq!(page.popular_tags.len(), 2);
    assert_eq!(page.popular_tags[0].title, "rust");
    assert_eq!(page.popular_tags[0].posts_with_tag, 3);
    assert_eq!(page.popular_tags[1].posts_with_tag, 1);

    let first = &page.most_popular_posts[0];
    assert_eq!(first.teaser_text.chars().count(), 200);
    assert_eq!(first.author, "author");
    assert_eq!(first.first_tag_title.as_deref(), Some("rust"));
}

#[tokio::test]
async fn test_post_detail() {
    let fixture = Fixture::new().with_author().await;
    let post = fixture.post("hello", 1, 2).await;
    fixture.tag("rust", &[&post]).await;

    let reader = User::new("reader");
    fixture.store.insert_user(reader.clone()).await.unwrap();
    let now = Utc::now();
    for (i, text) in ["first", "second"].iter().enumerate() {
        let comment = Comment::new(post.id, reader.id, *text)
            .published_at(now - Duration::minutes(10 - i as i64));
        fixture.store.insert_comment(comment).await.unwrap();
    }

    let page = fixture.pages.post_detail("hello").await.unwrap();

    assert_eq!(page.post.slug, "hello");
    assert_eq!(page.post.text.len(), 250);
    assert_eq!(page.post.likes_amount, 2);
    let comments: Vec<_> = page.post.comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(comments, ["first", "second"]);
    assert_eq!(page.post.comments[0].author, "reader");
    assert_eq!(page.post.tags[0].title, "rust");
    assert_eq!(page.most_popular_posts[0].comments_amount, 2);
}

#[tokio::test]
async fn test_post_detail_unknown_slug() {
    let fixture = Fixture::new().with_author().await;
    fixture.post("hello", 1, 0).await;

    let err = fixture.pages.post_detail("missing").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound {
            entity_type: "Post",
            ..
        }
    ));
}

#[tokio::test]
async fn test_tag_filter() {
    let fixture = Fixture::new().with_author().await;
    let mut tagged = Vec::new();
    for i in 0..25 {
        tagged.push(fixture.post(&format!("p{i}"), i, 0).await);
    }
    let untagged = fixture.post("plain", 0, 10).await;
    let refs: Vec<&Post> = tagged.iter().collect();
    fixture.tag("rust", &refs).await;

    let page = fixture.pages.tag_filter("rust").await.unwrap();

    assert_eq!(page.tag, "rust");
    assert_eq!(page.posts.len(), 20);
    assert!(page.posts.iter().all(|p| p.slug != untagged.slug));
    assert!(page.posts.iter().all(|p| p.first_tag_title.as_deref() == Some("rust")));
    assert_eq!(page.most_popular_posts[0].slug, "plain");
    assert!(page.most_popular_posts[0].first_tag_title.is_none());
    assert_eq!(page.popular_tags[0].posts_with_tag, 25);
}

#[tokio::test]
async fn test_tag_filter_unknown_tag() {
    let fixture = Fixture::new().with_author().await;

    let err = fixture.pages.tag_filter("nope").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound {
            entity_type: "Tag",
            ..
        }
    ));
}
