use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::jwt::JwtKeys;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::repo::{self, User};

/// Authenticated caller, resolved to a live user row.
///
/// Runs before any protected handler: parses the bearer token, verifies it,
/// then cross-checks the subject against the users table. That lookup is the
/// one storage read per request where a still-valid token for a deleted user
/// gets rejected.
pub struct AuthUser(pub User);

fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

fn unauthenticated() -> ApiError {
    // One uniform rejection; the reason never leaks to the client.
    ApiError::Unauthorized("Unauthenticated".to_string())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                warn!("missing Authorization header");
                unauthenticated()
            })?;

        let token = bearer_token(header).ok_or_else(|| {
            warn!("invalid auth scheme");
            unauthenticated()
        })?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token verification failed");
            unauthenticated()
        })?;

        let user = repo::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(user_id = claims.sub, "valid token for missing user");
                unauthenticated()
            })?;

        Ok(AuthUser(user))
    }
}
