use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Blog, Comment, Tag, User, VoteKind};
use crate::error::RepoError;

/// Generic repository trait for entities stored as a single record.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity. Stored entities are immutable.
    async fn save(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Find any user holding either the email or the username.
    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, RepoError>;

    /// Fetch every user in `ids`; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;

    /// All users except `id`, newest first.
    async fn list_excluding(&self, id: Uuid) -> Result<Vec<User>, RepoError>;
}

/// Selection for blog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogFilter {
    All,
    Author(Uuid),
    Tag(Tag),
}

/// Blog aggregate repository.
///
/// Comments have no repository of their own; every comment mutation goes
/// through the parent blog. Methods addressing a blog or comment that does
/// not exist return [`RepoError::NotFound`]. Vote increments must be applied
/// atomically by the store.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn insert(&self, blog: Blog) -> Result<Blog, RepoError>;

    /// Load a blog with its comments, oldest comment first.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, RepoError>;

    /// Blogs matching `filter`, newest first, comments loaded.
    async fn list(&self, filter: BlogFilter) -> Result<Vec<Blog>, RepoError>;

    /// Persist title, description, tags and `updated_at`.
    async fn update_content(&self, blog: &Blog) -> Result<(), RepoError>;

    /// Remove a blog and all of its comments in one step.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    async fn increment_vote(&self, id: Uuid, vote: VoteKind) -> Result<(), RepoError>;

    async fn push_comment(&self, blog_id: Uuid, comment: Comment) -> Result<(), RepoError>;

    async fn update_comment(
        &self,
        blog_id: Uuid,
        comment_id: Uuid,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepoError>;

    async fn remove_comment(&self, blog_id: Uuid, comment_id: Uuid) -> Result<(), RepoError>;

    async fn increment_comment_vote(
        &self,
        blog_id: Uuid,
        comment_id: Uuid,
        vote: VoteKind,
    ) -> Result<(), RepoError>;
}
