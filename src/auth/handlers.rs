use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{is_valid_email, AuthRequest, TokenResponse},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
    },
    error::{is_unique_violation, ApiError},
    extract::ValidatedJson,
    state::AppState,
    users::repo,
};

// Response texts are part of the API contract; clients match on them.
pub(crate) const CREDENTIALS_TAKEN: &str = "Credentials already taken!";
const CREDENTIALS_WRONG: &str = "Credentials are wrong!";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
}

fn validate_credentials(payload: &AuthRequest) -> Result<(), ApiError> {
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password.is_empty() {
        warn!("empty password");
        return Err(ApiError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AuthRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    validate_credentials(&payload)?;

    let hash = hash_password(&payload.password).map_err(ApiError::Internal)?;

    // The unique constraint on email is the arbiter; racing signups lose
    // here, never by silent overwrite.
    let user = match repo::create(&state.db, &payload.email, &hash).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %payload.email, "signup with taken email");
            return Err(ApiError::Conflict(CREDENTIALS_TAKEN.into()));
        }
        Err(e) => return Err(e.into()),
    };

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(user.id, &user.email).map_err(ApiError::Internal)?;

    info!(user_id = user.id, "user signed up");
    Ok((StatusCode::CREATED, Json(TokenResponse { access_token })))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AuthRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    validate_credentials(&payload)?;

    // Unknown email and wrong password produce the same response.
    let wrong_credentials = || ApiError::Forbidden(CREDENTIALS_WRONG.to_string());

    let user = repo::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "signin with unknown email");
            wrong_credentials()
        })?;

    let ok = verify_password(&payload.password, &user.password_hash).map_err(ApiError::Internal)?;
    if !ok {
        warn!(user_id = user.id, "signin with wrong password");
        return Err(wrong_credentials());
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(user.id, &user.email).map_err(ApiError::Internal)?;

    info!(user_id = user.id, "user signed in");
    Ok(Json(TokenResponse { access_token }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn validation_rejects_bad_email() {
        let err = validate_credentials(&AuthRequest {
            email: "not-an-email".into(),
            password: "pw".into(),
        })
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_rejects_empty_password() {
        let err = validate_credentials(&AuthRequest {
            email: "a@x.com".into(),
            password: String::new(),
        })
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_accepts_well_formed_credentials() {
        assert!(validate_credentials(&AuthRequest {
            email: "a@x.com".into(),
            password: "pw".into(),
        })
        .is_ok());
    }

    #[test]
    fn credential_messages_match_api_contract() {
        assert_eq!(CREDENTIALS_TAKEN, "Credentials already taken!");
        assert_eq!(CREDENTIALS_WRONG, "Credentials are wrong!");
    }
}
