//! PostgreSQL repository implementations.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::{DateTimeWithTimeZone, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use blog_core::domain::{Blog, Comment, User, VoteKind};
use blog_core::error::RepoError;
use blog_core::ports::{BlogFilter, BlogRepository, UserRepository};

use super::entity::blog::{self, Entity as BlogEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.len() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), username, "Checking for existing user");

        let result = UserEntity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(email))
                    .add(user::Column::Username.eq(username)),
            )
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_excluding(&self, id: Uuid) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Id.ne(id))
            .order_by_desc(user::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL blog repository. Comments live in `blog_comments` and are
/// loaded alongside their blog.
pub struct PostgresBlogRepository {
    db: Arc<DbConn>,
}

impl PostgresBlogRepository {
    pub fn new(db: impl Into<Arc<DbConn>>) -> Self {
        Self { db: db.into() }
    }

    /// Load comments for every blog in one query and assemble aggregates.
    async fn with_comments(&self, blogs: Vec<blog::Model>) -> Result<Vec<Blog>, RepoError> {
        if blogs.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = blogs.iter().map(|b| b.id).collect();
        let rows = CommentEntity::find()
            .filter(comment::Column::BlogId.is_in(ids))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        let mut by_blog: HashMap<Uuid, Vec<comment::Model>> = HashMap::new();
        for row in rows {
            by_blog.entry(row.blog_id).or_default().push(row);
        }

        Ok(blogs
            .into_iter()
            .map(|b| {
                let comments = by_blog.remove(&b.id).unwrap_or_default();
                b.into_domain(comments)
            })
            .collect())
    }
}

fn blog_vote_column(vote: VoteKind) -> blog::Column {
    match vote {
        VoteKind::Upvote => blog::Column::Upvotes,
        VoteKind::Downvote => blog::Column::Downvotes,
    }
}

fn comment_vote_column(vote: VoteKind) -> comment::Column {
    match vote {
        VoteKind::Upvote => comment::Column::Upvotes,
        VoteKind::Downvote => comment::Column::Downvotes,
    }
}

fn expect_one(rows_affected: u64) -> Result<(), RepoError> {
    if rows_affected == 0 {
        Err(RepoError::NotFound)
    } else {
        Ok(())
    }
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn insert(&self, blog: Blog) -> Result<Blog, RepoError> {
        blog::ActiveModel::from(&blog)
            .insert(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(blog)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        let Some(model) = BlogEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        Ok(self.with_comments(vec![model]).await?.pop())
    }

    async fn list(&self, filter: BlogFilter) -> Result<Vec<Blog>, RepoError> {
        let query = match filter {
            BlogFilter::All => BlogEntity::find(),
            BlogFilter::Author(author_id) => {
                BlogEntity::find().filter(blog::Column::AuthorId.eq(author_id))
            }
            BlogFilter::Tag(tag) => {
                // Containment, so the GIN index on tags applies.
                BlogEntity::find().filter(Expr::cust_with_values(
                    "\"blogs\".\"tags\" @> ARRAY[?]::text[]",
                    [tag.as_str()],
                ))
            }
        };

        let models = query
            .order_by_desc(blog::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        self.with_comments(models).await
    }

    async fn update_content(&self, blog: &Blog) -> Result<(), RepoError> {
        let updated_at: DateTimeWithTimeZone = blog.updated_at.into();

        let result = BlogEntity::update_many()
            .col_expr(blog::Column::Title, Expr::value(blog.title.clone()))
            .col_expr(blog::Column::Description, Expr::value(blog.description.clone()))
            .col_expr(blog::Column::Tags, Expr::value(blog::tag_strings(&blog.tags)))
            .col_expr(blog::Column::UpdatedAt, Expr::value(updated_at))
            .filter(blog::Column::Id.eq(blog.id))
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        expect_one(result.rows_affected)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // blog_comments rows follow via ON DELETE CASCADE.
        let result = BlogEntity::delete_by_id(id)
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        expect_one(result.rows_affected)
    }

    async fn increment_vote(&self, id: Uuid, vote: VoteKind) -> Result<(), RepoError> {
        let column = blog_vote_column(vote);

        let result = BlogEntity::update_many()
            .col_expr(column, Expr::col(column).add(1))
            .filter(blog::Column::Id.eq(id))
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        expect_one(result.rows_affected)
    }

    async fn push_comment(&self, blog_id: Uuid, comment: Comment) -> Result<(), RepoError> {
        comment::ActiveModel::for_blog(blog_id, comment)
            .insert(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    async fn update_comment(
        &self,
        blog_id: Uuid,
        comment_id: Uuid,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        let updated_at: DateTimeWithTimeZone = updated_at.into();

        let result = CommentEntity::update_many()
            .col_expr(comment::Column::Content, Expr::value(content))
            .col_expr(comment::Column::UpdatedAt, Expr::value(updated_at))
            .filter(comment::Column::Id.eq(comment_id))
            .filter(comment::Column::BlogId.eq(blog_id))
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        expect_one(result.rows_affected)
    }

    async fn remove_comment(&self, blog_id: Uuid, comment_id: Uuid) -> Result<(), RepoError> {
        let result = CommentEntity::delete_many()
            .filter(comment::Column::Id.eq(comment_id))
            .filter(comment::Column::BlogId.eq(blog_id))
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        expect_one(result.rows_affected)
    }

    async fn increment_comment_vote(
        &self,
        blog_id: Uuid,
        comment_id: Uuid,
        vote: VoteKind,
    ) -> Result<(), RepoError> {
        let column = comment_vote_column(vote);

        let result = CommentEntity::update_many()
            .col_expr(column, Expr::col(column).add(1))
            .filter(comment::Column::Id.eq(comment_id))
            .filter(comment::Column::BlogId.eq(blog_id))
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;

        expect_one(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::mask_email;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("a@example.com"), "***@example.com");
        assert_eq!(mask_email("no-at-sign"), "***");
    }
}
