//! Blog and comment lifecycle against the in-memory stores.

use std::sync::Arc;

use blog_core::domain::{BlogView, Gender, NewUser, Tag, User};
use blog_core::error::DomainError;
use blog_core::ports::BaseRepository;
use blog_core::services::{BlogPatch, BlogService, CommentInput, CommentVoteInput, NewBlogInput};
use blog_infra::{InMemoryBlogRepository, InMemoryUserRepository};
use uuid::Uuid;

struct Fixture {
    blogs: Arc<BlogService>,
    users: Arc<InMemoryUserRepository>,
}

impl Fixture {
    fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let blogs = Arc::new(BlogService::new(
            Arc::new(InMemoryBlogRepository::new()),
            users.clone(),
        ));
        Self { blogs, users }
    }

    async fn user(&self, username: &str) -> Uuid {
        let user = User::new(NewUser {
            name: username.to_string(),
            email: format!("{}@x.com", username),
            username: username.to_string(),
            password_hash: "$argon2id$unused".to_string(),
            profile_url: format!("http://x.com/{}", username),
            gender: Gender::Female,
            address: "addr".to_string(),
        });
        self.users.save(user).await.unwrap().id
    }

    async fn blog(&self, author: Uuid) -> BlogView {
        self.blogs
            .create(author, input("T", "D", &["sports"]))
            .await
            .unwrap()
    }
}

fn input(title: &str, description: &str, tags: &[&str]) -> NewBlogInput {
    NewBlogInput {
        title: Some(title.to_string()),
        description: Some(description.to_string()),
        tags: Some(tags.iter().map(|t| t.to_string()).collect()),
    }
}

fn comment(content: &str) -> CommentInput {
    CommentInput {
        content: Some(content.to_string()),
    }
}

fn vote(kind: &str) -> CommentVoteInput {
    CommentVoteInput {
        vote_type: Some(kind.to_string()),
    }
}

#[tokio::test]
async fn test_created_blog_round_trips() {
    let fx = Fixture::new();
    let author = fx.user("user_a").await;

    let created = fx
        .blogs
        .create(author, input("  Title  ", "Body", &["food", "nature", "food"]))
        .await
        .unwrap();
    let fetched = fx.blogs.get(created.id).await.unwrap();

    assert_eq!(fetched.title, "Title");
    assert_eq!(fetched.description, "Body");
    assert_eq!(fetched.tags, vec![Tag::Food, Tag::Nature]);
    assert_eq!(fetched.author_id, author);
    assert_eq!(fetched.author.as_ref().unwrap().username, "user_a");
    assert_eq!((fetched.upvotes, fetched.downvotes), (0, 0));
    assert!(fetched.comments.is_empty());
    assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn test_create_rejects_bad_input() {
    let fx = Fixture::new();
    let author = fx.user("user_a").await;

    let err = fx
        .blogs
        .create(author, input("T", "D", &["sports", "cooking", "knitting"]))
        .await
        .unwrap_err();
    match err {
        DomainError::InvalidTags { invalid } => assert_eq!(invalid, vec!["cooking", "knitting"]),
        other => panic!("unexpected {:?}", other),
    }

    let err = fx.blogs.create(author, input("T", "D", &[])).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "tags", .. }));

    let long_title = "x".repeat(201);
    let err = fx
        .blogs
        .create(author, input(&long_title, "D", &["food"]))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "title", .. }));

    let err = fx
        .blogs
        .create(Uuid::new_v4(), input("T", "D", &["food"]))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "User", .. }));
}

#[tokio::test]
async fn test_non_author_cannot_mutate_blog() {
    let fx = Fixture::new();
    let u1 = fx.user("user_one").await;
    let u2 = fx.user("user_two").await;
    let blog = fx.blog(u1).await;

    // Forbidden wins over an invalid payload.
    let invalid = BlogPatch {
        tags: Some(vec!["cooking".into()]),
        ..BlogPatch::default()
    };
    let err = fx.blogs.update(blog.id, u2, invalid).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let err = fx.blogs.delete(blog.id, u2).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let patch = BlogPatch {
        title: Some("X".into()),
        ..BlogPatch::default()
    };
    let updated = fx.blogs.update(blog.id, u1, patch).await.unwrap();
    assert_eq!(updated.title, "X");
    assert_eq!(updated.description, "D");
    assert_eq!(updated.tags, vec![Tag::Sports]);
    assert!(updated.updated_at >= blog.updated_at);
}

#[tokio::test]
async fn test_delete_removes_blog_and_comments() {
    let fx = Fixture::new();
    let author = fx.user("user_a").await;
    let blog = fx.blog(author).await;
    fx.blogs
        .add_comment(blog.id, author, comment("first"))
        .await
        .unwrap();

    fx.blogs.delete(blog.id, author).await.unwrap();

    let err = fx.blogs.get(blog.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Blog", .. }));

    let err = fx.blogs.delete(blog.id, author).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_listing_filters() {
    let fx = Fixture::new();
    let u1 = fx.user("user_one").await;
    let u2 = fx.user("user_two").await;

    let first = fx.blogs.create(u1, input("A", "D", &["sports"])).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    let second = fx.blogs.create(u2, input("B", "D", &["food"])).await.unwrap();

    let all = fx.blogs.list().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, second.id, "newest first");

    let by_author = fx.blogs.list_by_author(u1).await.unwrap();
    assert_eq!(by_author.len(), 1);
    assert_eq!(by_author[0].id, first.id);

    let by_tag = fx.blogs.list_by_tag("food").await.unwrap();
    assert_eq!(by_tag.len(), 1);
    assert_eq!(by_tag[0].id, second.id);

    let err = fx.blogs.list_by_tag("cooking").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidTags { .. }));
}

#[tokio::test]
async fn test_sequential_votes() {
    let fx = Fixture::new();
    let author = fx.user("user_a").await;
    let blog = fx.blog(author).await;

    for _ in 0..3 {
        fx.blogs.upvote(blog.id).await.unwrap();
    }
    let view = fx.blogs.downvote(blog.id).await.unwrap();

    assert_eq!(view.upvotes, 3);
    assert_eq!(view.downvotes, 1);

    let err = fx.blogs.upvote(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_upvotes_are_not_lost() {
    const N: usize = 64;

    let fx = Fixture::new();
    let author = fx.user("user_a").await;
    let blog = fx.blog(author).await;

    let tasks = (0..N).map(|_| {
        let blogs = fx.blogs.clone();
        tokio::spawn(async move { blogs.upvote(blog.id).await })
    });

    for result in futures::future::join_all(tasks).await {
        result.unwrap().unwrap();
    }

    let view = fx.blogs.get(blog.id).await.unwrap();
    assert_eq!(view.upvotes, N as i64);
}

#[tokio::test]
async fn test_comment_lifecycle() {
    let fx = Fixture::new();
    let author = fx.user("user_a").await;
    let other = fx.user("user_b").await;
    let blog = fx.blog(author).await;

    let view = fx
        .blogs
        .add_comment(blog.id, other, comment("nice post"))
        .await
        .unwrap();
    assert_eq!(view.comments.len(), 1);
    let c = &view.comments[0];
    assert_eq!(c.content, "nice post");
    assert_eq!(c.author.as_ref().unwrap().username, "user_b");
    assert_eq!((c.upvotes, c.downvotes), (0, 0));
    let comment_id = c.id;

    // The blog author does not own the comment.
    let err = fx
        .blogs
        .update_comment(blog.id, comment_id, author, comment("edited"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
    let err = fx
        .blogs
        .delete_comment(blog.id, comment_id, author)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let view = fx
        .blogs
        .update_comment(blog.id, comment_id, other, comment("edited"))
        .await
        .unwrap();
    assert_eq!(view.comments[0].content, "edited");

    let view = fx
        .blogs
        .delete_comment(blog.id, comment_id, other)
        .await
        .unwrap();
    assert!(view.comments.is_empty());

    let err = fx
        .blogs
        .delete_comment(blog.id, comment_id, other)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Comment", .. }));
}

#[tokio::test]
async fn test_comment_content_rules() {
    let fx = Fixture::new();
    let author = fx.user("user_a").await;
    let blog = fx.blog(author).await;

    let err = fx
        .blogs
        .add_comment(blog.id, author, comment("   "))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "content", .. }));

    let err = fx
        .blogs
        .add_comment(blog.id, author, comment(&"x".repeat(1001)))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "content", .. }));

    let err = fx
        .blogs
        .add_comment(Uuid::new_v4(), author, comment("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Blog", .. }));
}

#[tokio::test]
async fn test_comment_vote_type() {
    let fx = Fixture::new();
    let author = fx.user("user_a").await;
    let blog = fx.blog(author).await;
    let view = fx
        .blogs
        .add_comment(blog.id, author, comment("hi"))
        .await
        .unwrap();
    let comment_id = view.comments[0].id;

    let err = fx
        .blogs
        .vote_comment(blog.id, comment_id, vote("sideways"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "voteType", .. }));

    let view = fx
        .blogs
        .vote_comment(blog.id, comment_id, vote("upvote"))
        .await
        .unwrap();
    assert_eq!(view.comments[0].upvotes, 1);
    assert_eq!(view.comments[0].downvotes, 0);

    let view = fx
        .blogs
        .vote_comment(blog.id, comment_id, vote("downvote"))
        .await
        .unwrap();
    assert_eq!(view.comments[0].downvotes, 1);

    let err = fx
        .blogs
        .vote_comment(blog.id, Uuid::new_v4(), vote("upvote"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Comment", .. }));
}
