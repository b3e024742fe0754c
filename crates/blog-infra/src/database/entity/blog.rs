//! Blog entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use blog_core::domain::{Blog, Tag};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blogs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub tags: Vec<String>,
    pub upvotes: i64,
    pub downvotes: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Assemble the domain aggregate from a blog row and its comment rows.
    pub fn into_domain(self, comments: Vec<super::comment::Model>) -> Blog {
        let tags = self
            .tags
            .iter()
            .filter_map(|raw| match raw.parse::<Tag>() {
                Ok(tag) => Some(tag),
                Err(_) => {
                    tracing::warn!(blog_id = %self.id, tag = %raw, "Dropping unknown stored tag");
                    None
                }
            })
            .collect();

        Blog {
            id: self.id,
            author_id: self.author_id,
            title: self.title,
            description: self.description,
            tags,
            upvotes: self.upvotes,
            downvotes: self.downvotes,
            comments: comments.into_iter().map(Into::into).collect(),
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
        }
    }
}

pub fn tag_strings(tags: &[Tag]) -> Vec<String> {
    tags.iter().map(|t| t.as_str().to_string()).collect()
}

/// Conversion from the domain aggregate to the blog row (comments excluded).
impl From<&Blog> for ActiveModel {
    fn from(blog: &Blog) -> Self {
        Self {
            id: Set(blog.id),
            author_id: Set(blog.author_id),
            title: Set(blog.title.clone()),
            description: Set(blog.description.clone()),
            tags: Set(tag_strings(&blog.tags)),
            upvotes: Set(blog.upvotes),
            downvotes: Set(blog.downvotes),
            created_at: Set(blog.created_at.into()),
            updated_at: Set(blog.updated_at.into()),
        }
    }
}
