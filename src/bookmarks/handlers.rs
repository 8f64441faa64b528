use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::extractors::AuthUser, error::ApiError, extract::ValidatedJson, state::AppState,
};

use super::dto::{CreateBookmarkRequest, EditBookmarkRequest};
use super::repo::{self, Bookmark};

pub fn bookmark_routes() -> Router<AppState> {
    Router::new()
        .route("/bookmarks", get(list_bookmarks).post(create_bookmark))
        .route(
            "/bookmarks/:id",
            get(get_bookmark)
                .patch(update_bookmark)
                .delete(delete_bookmark),
        )
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn list_bookmarks(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Bookmark>>, ApiError> {
    let bookmarks = repo::list_by_user(&state.db, user.id).await?;
    Ok(Json(bookmarks))
}

/// Scoped read. A bookmark that is absent or belongs to someone else is
/// indistinguishable here: both answer with a null body, so the response
/// never confirms another user's record exists.
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn get_bookmark(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Option<Bookmark>>, ApiError> {
    let bookmark = repo::find_for_user(&state.db, user.id, id).await?;
    Ok(Json(bookmark))
}

#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn create_bookmark(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateBookmarkRequest>,
) -> Result<(StatusCode, Json<Bookmark>), ApiError> {
    payload.validate()?;
    let bookmark = repo::create(&state.db, user.id, &payload).await?;
    info!(bookmark_id = bookmark.id, "bookmark created");
    Ok((StatusCode::CREATED, Json(bookmark)))
}

// Writes load the row first and deny explicitly, unlike reads. Absent and
// not-owned still share one outcome.
fn owner_allows(bookmark: Option<&Bookmark>, caller_id: i64) -> Result<(), ApiError> {
    match bookmark {
        Some(b) if b.user_id == caller_id => Ok(()),
        _ => Err(ApiError::Forbidden("Access to resource denied".into())),
    }
}

async fn check_ownership(state: &AppState, caller_id: i64, id: i64) -> Result<(), ApiError> {
    let bookmark = repo::find_by_id(&state.db, id).await?;
    owner_allows(bookmark.as_ref(), caller_id).map_err(|e| {
        warn!(user_id = caller_id, bookmark_id = id, "ownership denied");
        e
    })
}

#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn update_bookmark(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<EditBookmarkRequest>,
) -> Result<Json<Bookmark>, ApiError> {
    payload.validate()?;
    check_ownership(&state, user.id, id).await?;
    let bookmark = repo::update(&state.db, id, &payload).await?;
    info!(bookmark_id = id, "bookmark updated");
    Ok(Json(bookmark))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn delete_bookmark(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    check_ownership(&state, user.id, id).await?;
    repo::delete(&state.db, id).await?;
    info!(bookmark_id = id, "bookmark deleted");
    Ok(StatusCode::NO_CONTENT)
}
