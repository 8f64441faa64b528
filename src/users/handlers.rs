use axum::{
    extract::State,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{dto::is_valid_email, extractors::AuthUser, handlers::CREDENTIALS_TAKEN},
    error::{is_unique_violation, ApiError},
    extract::ValidatedJson,
    state::AppState,
};

use super::dto::EditUserRequest;
use super::repo::{self, User};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(get_me))
        .route("/users", patch(edit_user))
}

/// The guard already loaded the caller's row; return it as-is (the
/// password hash is skipped on serialization).
#[instrument(skip_all)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn edit_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<EditUserRequest>,
) -> Result<Json<User>, ApiError> {
    if let Some(email) = payload.email.as_deref() {
        if !is_valid_email(email) {
            warn!(%email, "invalid email");
            return Err(ApiError::Validation("Invalid email".into()));
        }
    }

    let updated = match repo::update(&state.db, user.id, &payload).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!(user_id = user.id, "profile email already taken");
            return Err(ApiError::Conflict(CREDENTIALS_TAKEN.into()));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = user.id, "user updated");
    Ok(Json(updated))
}
