//! Domain entities - the core business objects.

mod blog;
mod tag;
mod user;

pub use blog::{Blog, BlogView, Comment, CommentView, VoteKind};
pub use tag::Tag;
pub use user::{AuthorSummary, Gender, NewUser, User, UserProfile};
