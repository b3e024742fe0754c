//! Blog handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_core::services::{BlogPatch, NewBlogInput};
use blog_shared::ApiResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/blogs
pub async fn create_blog(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<NewBlogInput>,
) -> AppResult<HttpResponse> {
    let blog = state
        .blogs
        .create(identity.user_id(), body.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(blog, "Blog created successfully")))
}

/// GET /api/blogs
pub async fn list_blogs(state: web::Data<AppState>, _identity: Identity) -> AppResult<HttpResponse> {
    let blogs = state.blogs.list().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(blogs, "Blogs fetched successfully")))
}

/// GET /api/blogs/{id}
pub async fn get_blog(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let blog = state.blogs.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(blog, "Blog fetched successfully")))
}

/// GET /api/blogs/author/{author_id}
pub async fn list_by_author(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let blogs = state.blogs.list_by_author(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(blogs, "Blogs fetched successfully")))
}

/// GET /api/blogs/tag/{tag}
pub async fn list_by_tag(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let blogs = state.blogs.list_by_tag(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(blogs, "Blogs fetched successfully")))
}

/// PUT /api/blogs/{id}
pub async fn update_blog(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<BlogPatch>,
) -> AppResult<HttpResponse> {
    let blog = state
        .blogs
        .update(path.into_inner(), identity.user_id(), body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(blog, "Blog updated successfully")))
}

/// DELETE /api/blogs/{id}
pub async fn delete_blog(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .blogs
        .delete(path.into_inner(), identity.user_id())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok((), "Blog deleted successfully")))
}

/// POST /api/blogs/{id}/upvote
pub async fn upvote(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let blog = state.blogs.upvote(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(blog, "Blog upvoted")))
}

/// POST /api/blogs/{id}/downvote
pub async fn downvote(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let blog = state.blogs.downvote(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(blog, "Blog downvoted")))
}
