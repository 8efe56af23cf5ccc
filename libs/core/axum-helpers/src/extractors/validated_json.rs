//! JSON body extractor that runs `validator` rules before the handler.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// `Json<T>` followed by [`Validate::validate`].
///
/// Malformed bodies are rejected with `JSON_EXTRACTION`, rule violations with
/// `VALIDATION_ERROR` and per-field details.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateEvent {
///     #[validate(length(min = 1, max = 255))]
///     title: String,
/// }
///
/// async fn create(ValidatedJson(input): ValidatedJson<CreateEvent>) -> String {
///     input.title
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::post};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1))]
        title: String,
    }

    async fn post_json(body: &'static str) -> StatusCode {
        let app = Router::new().route(
            "/",
            post(|ValidatedJson(p): ValidatedJson<Payload>| async move { p.title }),
        );
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_accepts_valid_body() {
        assert_eq!(post_json(r#"{"title":"Picnic"}"#).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_invalid_body() {
        assert_eq!(post_json(r#"{"title":""}"#).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_malformed_json() {
        assert_eq!(post_json(r#"{"title":"#).await, StatusCode::BAD_REQUEST);
    }
}
