//! SeaORM entities. A blog row plus its `blog_comments` rows form one
//! domain aggregate.

pub mod blog;
pub mod comment;
pub mod user;
