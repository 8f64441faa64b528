use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Request body for signup and signin.
#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after signup or signin.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}
