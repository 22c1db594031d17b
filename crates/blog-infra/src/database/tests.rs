#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use blog_core::domain::HydratedPost;
    use blog_core::ports::BlogStore;
    use blog_core::query::{
        PostFilter, PostOrder, PostQuery, PostRelation, TagFilter, TagOrder, TagQuery,
    };
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};

    use crate::database::entity::{post_tag, tag, user};
    use crate::database::postgres_store::PostgresBlogStore;

    fn empty_db() -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&'static str, Value>>::new()])
            .into_connection()
    }

    /// SQL of every statement the store sent, in order.
    fn logged_sql(store: PostgresBlogStore) -> Vec<String> {
        store
            .db
            .into_transaction_log()
            .iter()
            .flat_map(|tx| tx.statements().iter().map(|stmt| stmt.sql.clone()))
            .collect()
    }

    fn row(values: Vec<(&'static str, Value)>) -> BTreeMap<&'static str, Value> {
        values.into_iter().collect()
    }

    #[tokio::test]
    async fn test_popular_tags_carry_counts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                row(vec![
                    ("id", uuid::Uuid::new_v4().into()),
                    ("title", "rust".into()),
                    ("posts_count", 3i64.into()),
                ]),
                row(vec![
                    ("id", uuid::Uuid::new_v4().into()),
                    ("title", "web".into()),
                    ("posts_count", 1i64.into()),
                ]),
            ]])
            .into_connection();
        let store = PostgresBlogStore::new(db);

        let query = TagQuery::new()
            .order_by(TagOrder::PostsCountDesc)
            .limit(5)
            .with_posts_count();
        let tags = store.fetch_tags(&query).await.unwrap();

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].tag.title, "rust");
        assert_eq!(tags[0].posts_count, Some(3));
        assert_eq!(tags[1].posts_count, Some(1));
    }

    #[tokio::test]
    async fn test_find_tag_by_title() {
        let tag_id = uuid::Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![tag::Model {
                id: tag_id,
                title: "rust".to_owned(),
            }]])
            .into_connection();
        let store = PostgresBlogStore::new(db);

        let query = TagQuery::new()
            .filter(TagFilter::Title("rust".to_owned()))
            .limit(1);
        let tags = store.fetch_tags(&query).await.unwrap();

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].tag.id, tag_id);
        assert_eq!(tags[0].posts_count, None);
    }

    #[tokio::test]
    async fn test_fetch_posts_preloads_relations() {
        let author_id = uuid::Uuid::new_v4();
        let post_id = uuid::Uuid::new_v4();
        let tag_id = uuid::Uuid::new_v4();
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // posts with like counts
            .append_query_results([vec![row(vec![
                ("id", post_id.into()),
                ("author_id", author_id.into()),
                ("title", "Hello".into()),
                ("text", "Body".into()),
                ("slug", "hello".into()),
                ("image", Value::String(None)),
                ("published_at", now.into()),
                ("likes_count", 4i64.into()),
            ])]])
            // authors
            .append_query_results([vec![user::Model {
                id: author_id,
                username: "alice".to_owned(),
            }]])
            // post/tag links
            .append_query_results([vec![post_tag::Model { post_id, tag_id }]])
            // tags with post counts
            .append_query_results([vec![row(vec![
                ("id", tag_id.into()),
                ("title", "rust".into()),
                ("posts_count", 2i64.into()),
            ])]])
            // comment counts
            .append_query_results([vec![row(vec![
                ("post_id", post_id.into()),
                ("count", 6i64.into()),
            ])]])
            .into_connection();
        let store = PostgresBlogStore::new(db);

        let query = PostQuery::new()
            .order_by(PostOrder::LikesDesc)
            .limit(5)
            .preload(&[
                PostRelation::Author,
                PostRelation::Tags,
                PostRelation::CommentsCount,
            ]);
        let rows = store.fetch_posts(&query).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].likes_count, None);
        let hydrated = HydratedPost::try_from(rows[0].clone()).unwrap();
        assert_eq!(hydrated.author.username, "alice");
        assert_eq!(hydrated.comments_count, 6);
        assert_eq!(hydrated.tags[0].tag.title, "rust");
        assert_eq!(hydrated.tags[0].posts_count, 2);
    }

    #[tokio::test]
    async fn test_fetch_posts_empty() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&'static str, Value>>::new()])
            .into_connection();
        let store = PostgresBlogStore::new(db);

        let query = PostQuery::new().preload(&[PostRelation::Author]);
        let rows = store.fetch_posts(&query).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_likes_ranking_sorts_in_sql() {
        let store = PostgresBlogStore::new(empty_db());
        let query = PostQuery::new().order_by(PostOrder::LikesDesc).limit(5);
        store.fetch_posts(&query).await.unwrap();

        let sql = logged_sql(store);
        assert_eq!(sql.len(), 1);
        assert!(sql[0].contains(r#"COUNT("post_likes"."user_id") AS "likes_count""#));
        assert!(sql[0].contains(
            r#"GROUP BY "posts"."id" ORDER BY likes_count DESC, "posts"."published_at" DESC, "posts"."id" ASC LIMIT $1"#
        ));
    }

    #[tokio::test]
    async fn test_tag_filter_uses_link_subquery() {
        let store = PostgresBlogStore::new(empty_db());
        let query = PostQuery::new()
            .filter(PostFilter::Tag(uuid::Uuid::new_v4()))
            .limit(20);
        store.fetch_posts(&query).await.unwrap();

        let sql = logged_sql(store);
        assert!(sql[0].contains(
            r#"WHERE "posts"."id" IN (SELECT "post_id" FROM "post_tags" WHERE "post_tags"."tag_id" = $1)"#
        ));
        assert!(sql[0].contains(r#"ORDER BY "posts"."published_at" DESC, "posts"."id" ASC"#));
        assert!(!sql[0].contains("likes_count DESC"));
    }

    #[tokio::test]
    async fn test_tag_ranking_sorts_in_sql() {
        let store = PostgresBlogStore::new(empty_db());
        let query = TagQuery::new()
            .order_by(TagOrder::PostsCountDesc)
            .limit(5)
            .with_posts_count();
        store.fetch_tags(&query).await.unwrap();

        let sql = logged_sql(store);
        assert!(sql[0].contains(r#"COUNT("post_tags"."post_id") AS "posts_count""#));
        assert!(sql[0].contains(
            r#"GROUP BY "tags"."id" ORDER BY posts_count DESC, "tags"."title" ASC LIMIT $1"#
        ));
    }
}
