use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateBookmarkRequest {
    pub title: String,
    pub link: String,
    pub description: Option<String>,
}

impl CreateBookmarkRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("Title must not be empty".into()));
        }
        if self.link.trim().is_empty() {
            return Err(ApiError::Validation("Link must not be empty".into()));
        }
        Ok(())
    }
}

/// Partial update; absent fields stay untouched.
#[derive(Debug, Deserialize)]
pub struct EditBookmarkRequest {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
}

impl EditBookmarkRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ApiError::Validation("Title must not be empty".into()));
        }
        if self.link.as_deref().is_some_and(|l| l.trim().is_empty()) {
            return Err(ApiError::Validation("Link must not be empty".into()));
        }
        Ok(())
    }
}
