//! Comment handlers. Every operation answers with the whole parent blog.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_core::services::{CommentInput, CommentVoteInput};
use blog_shared::ApiResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/blogs/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentInput>,
) -> AppResult<HttpResponse> {
    let blog = state
        .blogs
        .add_comment(path.into_inner(), identity.user_id(), body.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(blog, "Comment added successfully")))
}

/// PUT /api/blogs/{id}/comments/{comment_id}
pub async fn update_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentInput>,
) -> AppResult<HttpResponse> {
    let (blog_id, comment_id) = path.into_inner();
    let blog = state
        .blogs
        .update_comment(blog_id, comment_id, identity.user_id(), body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(blog, "Comment updated successfully")))
}

/// DELETE /api/blogs/{id}/comments/{comment_id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (blog_id, comment_id) = path.into_inner();
    let blog = state
        .blogs
        .delete_comment(blog_id, comment_id, identity.user_id())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(blog, "Comment deleted successfully")))
}

/// POST /api/blogs/{id}/comments/{comment_id}/vote
pub async fn vote_comment(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentVoteInput>,
) -> AppResult<HttpResponse> {
    let (blog_id, comment_id) = path.into_inner();
    let blog = state
        .blogs
        .vote_comment(blog_id, comment_id, body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(blog, "Comment voted")))
}
