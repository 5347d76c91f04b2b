use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has passed `validator` checks.
///
/// Malformed JSON rejects with `INVALID_JSON`; failed validation rejects with 400
/// `VALIDATION_ERROR` and per-field details.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateProduct {
///     #[validate(length(min = 1))]
///     name: String,
/// }
///
/// async fn create(ValidatedJson(payload): ValidatedJson<CreateProduct>) -> String {
///     payload.name
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
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::post};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1, max = 4))]
        tag: String,
    }

    async fn post_json(body: &str) -> StatusCode {
        let app = Router::new().route(
            "/",
            post(|ValidatedJson(p): ValidatedJson<Payload>| async move { p.tag }),
        );
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
    }

    #[tokio::test]
    async fn test_accepts_valid_body() {
        assert_eq!(post_json(r#"{"tag":"ok"}"#).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_invalid_field() {
        assert_eq!(post_json(r#"{"tag":"toolong"}"#).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_missing_field() {
        assert_eq!(post_json(r#"{}"#).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_malformed_json() {
        assert_eq!(post_json("{not json").await, StatusCode::BAD_REQUEST);
    }
}
