//! User directory handlers.

use actix_web::{HttpResponse, web};

use blog_shared::ApiResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/users - every user except the caller
pub async fn list_users(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let users = state.auth.list_users_except(identity.user_id()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(users, "Users fetched successfully")))
}
