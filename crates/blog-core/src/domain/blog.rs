use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tag::Tag;
use super::user::AuthorSummary;

/// Which counter a vote increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Upvote,
    Downvote,
}

impl std::str::FromStr for VoteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" => Ok(VoteKind::Upvote),
            "downvote" => Ok(VoteKind::Downvote),
            other => Err(other.to_string()),
        }
    }
}

/// Blog aggregate - a post together with its embedded comments.
#[derive(Debug, Clone)]
pub struct Blog {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
    pub tags: Vec<Tag>,
    pub upvotes: i64,
    pub downvotes: i64,
    /// Oldest first.
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    /// Create a new blog with zero votes and no comments.
    pub fn new(author_id: Uuid, title: String, description: String, tags: Vec<Tag>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            description,
            tags,
            upvotes: 0,
            downvotes: 0,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn comment(&self, comment_id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    /// Every user id referenced by this blog and its comments.
    pub fn referenced_users(&self) -> impl Iterator<Item = Uuid> + '_ {
        std::iter::once(self.author_id).chain(self.comments.iter().map(|c| c.author_id))
    }
}

/// Comment embedded in a blog. Its id is only meaningful within the parent.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub upvotes: i64,
    pub downvotes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(author_id: Uuid, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            content,
            upvotes: 0,
            downvotes: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

/// Blog as returned to clients, with authors resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub tags: Vec<Tag>,
    pub author_id: Uuid,
    /// `None` when the author account no longer exists.
    pub author: Option<AuthorSummary>,
    pub upvotes: i64,
    pub downvotes: i64,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author: Option<AuthorSummary>,
    pub content: String,
    pub upvotes: i64,
    pub downvotes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogView {
    /// Build a view, resolving authors through `lookup`.
    pub fn build<F>(blog: Blog, lookup: F) -> Self
    where
        F: Fn(Uuid) -> Option<AuthorSummary>,
    {
        let comments = blog
            .comments
            .into_iter()
            .map(|c| CommentView {
                id: c.id,
                author_id: c.author_id,
                author: lookup(c.author_id),
                content: c.content,
                upvotes: c.upvotes,
                downvotes: c.downvotes,
                created_at: c.created_at,
                updated_at: c.updated_at,
            })
            .collect();

        Self {
            id: blog.id,
            title: blog.title,
            description: blog.description,
            tags: blog.tags,
            author_id: blog.author_id,
            author: lookup(blog.author_id),
            upvotes: blog.upvotes,
            downvotes: blog.downvotes,
            comments,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }
}
