use sea_orm_migration::prelude::*;

use crate::m20240601_000001_create_users::Users;
use crate::m20240601_000002_create_blogs::Blogs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlogComments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlogComments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlogComments::BlogId).uuid().not_null())
                    .col(ColumnDef::new(BlogComments::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(BlogComments::Content).text().not_null())
                    .col(
                        ColumnDef::new(BlogComments::Upvotes)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BlogComments::Downvotes)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BlogComments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BlogComments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_comments_blog")
                            .from(BlogComments::Table, BlogComments::BlogId)
                            .to(Blogs::Table, Blogs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_comments_author")
                            .from(BlogComments::Table, BlogComments::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Comments are always read per blog, oldest first.
        manager
            .create_index(
                Index::create()
                    .name("idx_blog_comments_blog_id_created_at")
                    .table(BlogComments::Table)
                    .col(BlogComments::BlogId)
                    .col(BlogComments::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlogComments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BlogComments {
    Table,
    Id,
    BlogId,
    AuthorId,
    Content,
    Upvotes,
    Downvotes,
    CreatedAt,
    UpdatedAt,
}
