//! Content store: blogs, their embedded comments, and votes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{AuthorSummary, Blog, BlogView, Comment, Tag, VoteKind};
use crate::error::{DomainError, RepoError};
use crate::ports::{BlogFilter, BlogRepository, UserRepository};
use crate::validation;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBlogInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentInput {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentVoteInput {
    #[serde(alias = "voteType")]
    pub vote_type: Option<String>,
}

const BLOG: &str = "Blog";
const COMMENT: &str = "Comment";
const USER: &str = "User";

pub struct BlogService {
    blogs: Arc<dyn BlogRepository>,
    users: Arc<dyn UserRepository>,
}

impl BlogService {
    pub fn new(blogs: Arc<dyn BlogRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { blogs, users }
    }

    pub async fn create(
        &self,
        author_id: Uuid,
        input: NewBlogInput,
    ) -> Result<BlogView, DomainError> {
        let title = validation::title(&validation::required("title", "Title", input.title)?)?;
        let description = validation::description(&validation::required(
            "description",
            "Description",
            input.description,
        )?)?;
        let tags = validation::tags(&input.tags.unwrap_or_default())?;

        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(DomainError::not_found(USER, author_id));
        }

        let blog = self
            .blogs
            .insert(Blog::new(author_id, title, description, tags))
            .await?;

        tracing::info!(blog_id = %blog.id, author_id = %author_id, "Blog created");

        self.view(blog).await
    }

    pub async fn list(&self) -> Result<Vec<BlogView>, DomainError> {
        self.list_filtered(BlogFilter::All).await
    }

    pub async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<BlogView>, DomainError> {
        self.list_filtered(BlogFilter::Author(author_id)).await
    }

    /// Blogs carrying `tag`; an unknown tag is rejected.
    pub async fn list_by_tag(&self, tag: &str) -> Result<Vec<BlogView>, DomainError> {
        let tag: Tag = tag
            .parse()
            .map_err(|invalid| DomainError::InvalidTags {
                invalid: vec![invalid],
            })?;
        self.list_filtered(BlogFilter::Tag(tag)).await
    }

    pub async fn get(&self, id: Uuid) -> Result<BlogView, DomainError> {
        let blog = self.load(id).await?;
        self.view(blog).await
    }

    /// Owner-gated partial update. Ownership is checked before the patch is
    /// validated.
    pub async fn update(
        &self,
        id: Uuid,
        requester_id: Uuid,
        patch: BlogPatch,
    ) -> Result<BlogView, DomainError> {
        let mut blog = self.load(id).await?;

        if !blog.is_authored_by(requester_id) {
            tracing::warn!(blog_id = %id, requester_id = %requester_id, "Rejected blog update by non-author");
            return Err(DomainError::Forbidden(
                "You can only update your own blogs".to_string(),
            ));
        }

        if let Some(title) = patch.title {
            blog.title = validation::title(&title)?;
        }
        if let Some(description) = patch.description {
            blog.description = validation::description(&description)?;
        }
        if let Some(tags) = patch.tags {
            blog.tags = validation::tags(&tags)?;
        }
        blog.updated_at = Utc::now();

        self.blogs
            .update_content(&blog)
            .await
            .map_err(missing(BLOG, id))?;

        tracing::info!(blog_id = %id, "Blog updated");

        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid, requester_id: Uuid) -> Result<(), DomainError> {
        let blog = self.load(id).await?;

        if !blog.is_authored_by(requester_id) {
            tracing::warn!(blog_id = %id, requester_id = %requester_id, "Rejected blog delete by non-author");
            return Err(DomainError::Forbidden(
                "You can only delete your own blogs".to_string(),
            ));
        }

        self.blogs.delete(id).await.map_err(missing(BLOG, id))?;

        tracing::info!(blog_id = %id, comments = blog.comments.len(), "Blog deleted");
        Ok(())
    }

    pub async fn upvote(&self, id: Uuid) -> Result<BlogView, DomainError> {
        self.vote(id, VoteKind::Upvote).await
    }

    pub async fn downvote(&self, id: Uuid) -> Result<BlogView, DomainError> {
        self.vote(id, VoteKind::Downvote).await
    }

    async fn vote(&self, id: Uuid, vote: VoteKind) -> Result<BlogView, DomainError> {
        self.blogs
            .increment_vote(id, vote)
            .await
            .map_err(missing(BLOG, id))?;

        tracing::debug!(blog_id = %id, ?vote, "Blog voted");

        self.get(id).await
    }

    pub async fn add_comment(
        &self,
        blog_id: Uuid,
        author_id: Uuid,
        input: CommentInput,
    ) -> Result<BlogView, DomainError> {
        self.load(blog_id).await?;

        let content = validation::comment_content(&input.content.unwrap_or_default())?;
        let comment = Comment::new(author_id, content);
        let comment_id = comment.id;

        self.blogs
            .push_comment(blog_id, comment)
            .await
            .map_err(missing(BLOG, blog_id))?;

        tracing::info!(blog_id = %blog_id, comment_id = %comment_id, "Comment added");

        self.get(blog_id).await
    }

    pub async fn update_comment(
        &self,
        blog_id: Uuid,
        comment_id: Uuid,
        requester_id: Uuid,
        input: CommentInput,
    ) -> Result<BlogView, DomainError> {
        let blog = self.load(blog_id).await?;
        let comment = blog
            .comment(comment_id)
            .ok_or_else(|| DomainError::not_found(COMMENT, comment_id))?;

        if !comment.is_authored_by(requester_id) {
            return Err(DomainError::Forbidden(
                "You can only edit your own comments".to_string(),
            ));
        }

        let content = validation::comment_content(&input.content.unwrap_or_default())?;

        self.blogs
            .update_comment(blog_id, comment_id, &content, Utc::now())
            .await
            .map_err(missing(COMMENT, comment_id))?;

        tracing::info!(blog_id = %blog_id, comment_id = %comment_id, "Comment updated");

        self.get(blog_id).await
    }

    pub async fn delete_comment(
        &self,
        blog_id: Uuid,
        comment_id: Uuid,
        requester_id: Uuid,
    ) -> Result<BlogView, DomainError> {
        let blog = self.load(blog_id).await?;
        let comment = blog
            .comment(comment_id)
            .ok_or_else(|| DomainError::not_found(COMMENT, comment_id))?;

        if !comment.is_authored_by(requester_id) {
            return Err(DomainError::Forbidden(
                "You can only delete your own comments".to_string(),
            ));
        }

        self.blogs
            .remove_comment(blog_id, comment_id)
            .await
            .map_err(missing(COMMENT, comment_id))?;

        tracing::info!(blog_id = %blog_id, comment_id = %comment_id, "Comment deleted");

        self.get(blog_id).await
    }

    pub async fn vote_comment(
        &self,
        blog_id: Uuid,
        comment_id: Uuid,
        input: CommentVoteInput,
    ) -> Result<BlogView, DomainError> {
        let vote: VoteKind = input
            .vote_type
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|_| {
                DomainError::validation("voteType", "voteType must be 'upvote' or 'downvote'")
            })?;

        let blog = self.load(blog_id).await?;
        if blog.comment(comment_id).is_none() {
            return Err(DomainError::not_found(COMMENT, comment_id));
        }

        self.blogs
            .increment_comment_vote(blog_id, comment_id, vote)
            .await
            .map_err(missing(COMMENT, comment_id))?;

        tracing::debug!(blog_id = %blog_id, comment_id = %comment_id, ?vote, "Comment voted");

        self.get(blog_id).await
    }

    async fn load(&self, id: Uuid) -> Result<Blog, DomainError> {
        self.blogs
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(BLOG, id))
    }

    async fn list_filtered(&self, filter: BlogFilter) -> Result<Vec<BlogView>, DomainError> {
        let blogs = self.blogs.list(filter).await?;
        self.views(blogs).await
    }

    async fn view(&self, blog: Blog) -> Result<BlogView, DomainError> {
        let mut views = self.views(vec![blog]).await?;
        views
            .pop()
            .ok_or_else(|| DomainError::Internal("blog view missing".to_string()))
    }

    /// Resolve every referenced author with a single user lookup.
    async fn views(&self, blogs: Vec<Blog>) -> Result<Vec<BlogView>, DomainError> {
        let ids: Vec<Uuid> = blogs
            .iter()
            .flat_map(Blog::referenced_users)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let authors: HashMap<Uuid, AuthorSummary> = self
            .users
            .find_by_ids(&ids)
            .await?
            .iter()
            .map(|u| (u.id, u.summary()))
            .collect();

        Ok(blogs
            .into_iter()
            .map(|blog| BlogView::build(blog, |id| authors.get(&id).cloned()))
            .collect())
    }
}

/// Map a repository `NotFound` to the domain entity that was addressed.
fn missing(entity_type: &'static str, id: Uuid) -> impl FnOnce(RepoError) -> DomainError {
    move |err| match err {
        RepoError::NotFound => DomainError::not_found(entity_type, id),
        other => other.into(),
    }
}
