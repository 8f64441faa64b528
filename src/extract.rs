use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::ApiError;

/// JSON body extractor whose rejection is a 400, not axum's default 422.
/// Missing or mistyped fields surface the same way as the explicit field
/// validators downstream.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                warn!(error = %rejection.body_text(), "malformed request body");
                Err(ApiError::Validation(rejection.body_text()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request as HttpRequest, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct SignupBody {
        email: String,
        password: String,
    }

    fn json_request(body: &'static str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn well_formed_body_parses() {
        let req = json_request(r#"{"email":"a@x.com","password":"pw"}"#);
        let ValidatedJson(body) = ValidatedJson::<SignupBody>::from_request(req, &())
            .await
            .expect("body should parse");
        assert_eq!(body.email, "a@x.com");
        assert_eq!(body.password, "pw");
    }

    #[tokio::test]
    async fn missing_field_is_400() {
        let req = json_request(r#"{"email":"a@x.com"}"#);
        let err = ValidatedJson::<SignupBody>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn mistyped_field_is_400() {
        let req = json_request(r#"{"email":42,"password":"pw"}"#);
        let err = ValidatedJson::<SignupBody>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_content_type_is_400() {
        let req = HttpRequest::builder()
            .method("POST")
            .body(Body::from(r#"{"email":"a@x.com","password":"pw"}"#))
            .unwrap();
        let err = ValidatedJson::<SignupBody>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
