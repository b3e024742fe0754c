//! Authentication extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;

use blog_core::domain::UserProfile;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated user, resolved from the bearer token on every request.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.user().username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity(pub UserProfile);

impl Identity {
    pub fn user(&self) -> &UserProfile {
        &self.0
    }

    pub fn user_id(&self) -> uuid::Uuid {
        self.0.id
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(req: &HttpRequest) -> Result<String, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthenticated("Authorization token required".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthenticated("Invalid authorization header".to_string()))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AppError::Unauthenticated(
            "Expected Bearer token".to_string(),
        )),
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let state = state.ok_or_else(|| {
                AppError::Configuration("AppState not found in app data".to_string())
            })?;
            let token = token?;

            let user = state.auth.authenticate(&token).await.map_err(|e| {
                tracing::debug!(error = %e, "Rejected bearer token");
                AppError::from(e)
            })?;

            Ok(Identity(user))
        })
    }
}
