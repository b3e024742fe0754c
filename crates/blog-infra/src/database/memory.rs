//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Each repository guards its map with an async `RwLock`. Every mutation,
//! vote increments included, happens under a single write-lock acquisition,
//! which makes it atomic with respect to other requests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{Blog, Comment, User, VoteKind};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, BlogFilter, BlogRepository, UserRepository};

/// In-memory user repository enforcing unique email and username.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        let taken = users.values().any(|existing| {
            existing.id != user.id
                && (existing.email == user.email || existing.username == user.username)
        });
        if taken {
            return Err(RepoError::Constraint(
                "duplicate email or username".to_string(),
            ));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email == email || u.username == username)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn list_excluding(&self, id: Uuid) -> Result<Vec<User>, RepoError> {
        let users = self.users.read().await;
        let mut others: Vec<User> = users.values().filter(|u| u.id != id).cloned().collect();
        others.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(others)
    }
}

/// In-memory blog repository holding whole aggregates.
#[derive(Default)]
pub struct InMemoryBlogRepository {
    blogs: RwLock<HashMap<Uuid, Blog>>,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn bump(upvotes: &mut i64, downvotes: &mut i64, vote: VoteKind) {
    match vote {
        VoteKind::Upvote => *upvotes += 1,
        VoteKind::Downvote => *downvotes += 1,
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn insert(&self, blog: Blog) -> Result<Blog, RepoError> {
        let mut blogs = self.blogs.write().await;
        if blogs.contains_key(&blog.id) {
            return Err(RepoError::Constraint("duplicate blog id".to_string()));
        }
        blogs.insert(blog.id, blog.clone());
        Ok(blog)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        Ok(self.blogs.read().await.get(&id).cloned())
    }

    async fn list(&self, filter: BlogFilter) -> Result<Vec<Blog>, RepoError> {
        let blogs = self.blogs.read().await;
        let mut selected: Vec<Blog> = blogs
            .values()
            .filter(|b| match filter {
                BlogFilter::All => true,
                BlogFilter::Author(author_id) => b.author_id == author_id,
                BlogFilter::Tag(tag) => b.tags.contains(&tag),
            })
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(selected)
    }

    async fn update_content(&self, blog: &Blog) -> Result<(), RepoError> {
        let mut blogs = self.blogs.write().await;
        let stored = blogs.get_mut(&blog.id).ok_or(RepoError::NotFound)?;
        stored.title = blog.title.clone();
        stored.description = blog.description.clone();
        stored.tags = blog.tags.clone();
        stored.updated_at = blog.updated_at;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.blogs
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn increment_vote(&self, id: Uuid, vote: VoteKind) -> Result<(), RepoError> {
        let mut blogs = self.blogs.write().await;
        let blog = blogs.get_mut(&id).ok_or(RepoError::NotFound)?;
        bump(&mut blog.upvotes, &mut blog.downvotes, vote);
        Ok(())
    }

    async fn push_comment(&self, blog_id: Uuid, comment: Comment) -> Result<(), RepoError> {
        let mut blogs = self.blogs.write().await;
        let blog = blogs.get_mut(&blog_id).ok_or(RepoError::NotFound)?;
        blog.comments.push(comment);
        Ok(())
    }

    async fn update_comment(
        &self,
        blog_id: Uuid,
        comment_id: Uuid,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        let mut blogs = self.blogs.write().await;
        let comment = blogs
            .get_mut(&blog_id)
            .and_then(|b| b.comments.iter_mut().find(|c| c.id == comment_id))
            .ok_or(RepoError::NotFound)?;
        comment.content = content.to_string();
        comment.updated_at = updated_at;
        Ok(())
    }

    async fn remove_comment(&self, blog_id: Uuid, comment_id: Uuid) -> Result<(), RepoError> {
        let mut blogs = self.blogs.write().await;
        let blog = blogs.get_mut(&blog_id).ok_or(RepoError::NotFound)?;
        let before = blog.comments.len();
        blog.comments.retain(|c| c.id != comment_id);
        if blog.comments.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn increment_comment_vote(
        &self,
        blog_id: Uuid,
        comment_id: Uuid,
        vote: VoteKind,
    ) -> Result<(), RepoError> {
        let mut blogs = self.blogs.write().await;
        let comment = blogs
            .get_mut(&blog_id)
            .and_then(|b| b.comments.iter_mut().find(|c| c.id == comment_id))
            .ok_or(RepoError::NotFound)?;
        bump(&mut comment.upvotes, &mut comment.downvotes, vote);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::domain::{Gender, NewUser, Tag};

    fn user(email: &str, username: &str) -> User {
        User::new(NewUser {
            name: "Test".to_string(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash: "hash".to_string(),
            profile_url: "http://x.com/t".to_string(),
            gender: Gender::Male,
            address: "addr".to_string(),
        })
    }

    #[tokio::test]
    async fn test_user_save_enforces_uniqueness() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("a@x.com", "user_a")).await.unwrap();

        let dup_email = repo.save(user("a@x.com", "user_b")).await;
        let dup_username = repo.save(user("b@x.com", "user_a")).await;

        assert!(matches!(dup_email, Err(RepoError::Constraint(_))));
        assert!(matches!(dup_username, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_list_excluding_skips_requester() {
        let repo = InMemoryUserRepository::new();
        let me = repo.save(user("a@x.com", "user_a")).await.unwrap();
        let other = repo.save(user("b@x.com", "user_b")).await.unwrap();

        let listed = repo.list_excluding(me.id).await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, other.id);
    }

    #[tokio::test]
    async fn test_comment_mutations_on_missing_comment() {
        let repo = InMemoryBlogRepository::new();
        let blog = repo
            .insert(Blog::new(Uuid::new_v4(), "T".into(), "D".into(), vec![Tag::Food]))
            .await
            .unwrap();
        let ghost = Uuid::new_v4();

        assert!(matches!(
            repo.remove_comment(blog.id, ghost).await,
            Err(RepoError::NotFound)
        ));
        assert!(matches!(
            repo.increment_comment_vote(blog.id, ghost, VoteKind::Upvote)
                .await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_filter_by_tag() {
        let repo = InMemoryBlogRepository::new();
        let author = Uuid::new_v4();
        repo.insert(Blog::new(author, "A".into(), "D".into(), vec![Tag::Food]))
            .await
            .unwrap();
        repo.insert(Blog::new(author, "B".into(), "D".into(), vec![Tag::Sports, Tag::Food]))
            .await
            .unwrap();

        assert_eq!(repo.list(BlogFilter::Tag(Tag::Food)).await.unwrap().len(), 2);
        assert_eq!(repo.list(BlogFilter::Tag(Tag::Sports)).await.unwrap().len(), 1);
        assert!(repo.list(BlogFilter::Tag(Tag::Nature)).await.unwrap().is_empty());
    }
}
