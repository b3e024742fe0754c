//! Authentication handlers.

use actix_web::{HttpResponse, web};

use blog_core::services::{LoginInput, SignupInput};
use blog_shared::ApiResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/auth/signup
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupInput>,
) -> AppResult<HttpResponse> {
    let session = state.auth.signup(body.into_inner()).await?;

    Ok(HttpResponse::Created().json(
        ApiResponse::ok(session.user, "User registered successfully").with_token(session.token),
    ))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginInput>,
) -> AppResult<HttpResponse> {
    let session = state.auth.login(body.into_inner()).await?;

    Ok(HttpResponse::Created()
        .json(ApiResponse::ok(session.user, "Login successful").with_token(session.token)))
}

/// GET /api/auth/me - Protected route
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(identity.user().clone(), "Current user")))
}
