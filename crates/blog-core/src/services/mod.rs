//! Application services - the stores that own the domain invariants.

mod auth;
mod blog;

pub use auth::{AuthService, AuthSession, LoginInput, SignupInput};
pub use blog::{BlogPatch, BlogService, CommentInput, CommentVoteInput, NewBlogInput};
