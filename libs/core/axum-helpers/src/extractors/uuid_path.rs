use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

/// Single UUID path parameter.
///
/// ```ignore
/// async fn get_product(UuidPath(id): UuidPath) -> String {
///     format!("Product ID: {}", id)
/// }
///
/// let app = Router::new().route("/products/{id}", get(get_product));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct UuidPath(pub Uuid);

/// Two UUID path parameters, in route order, e.g. `/products/{id}/options/{option_id}`.
#[derive(Debug, Clone, Copy)]
pub struct UuidPathPair(pub Uuid, pub Uuid);

fn parse(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|e| {
        tracing::debug!(value = raw, "Rejected malformed UUID path parameter");
        AppError::UuidError(e)
    })
}

fn path_rejection(e: axum::extract::rejection::PathRejection) -> AppError {
    AppError::BadRequest(e.body_text())
}

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(path_rejection)?;

        Ok(UuidPath(parse(&id)?))
    }
}

impl<S> FromRequestParts<S> for UuidPathPair
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((first, second)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(path_rejection)?;

        Ok(UuidPathPair(parse(&first)?, parse(&second)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/items/{id}", get(|UuidPath(id): UuidPath| async move { id.to_string() }))
            .route(
                "/items/{id}/parts/{part_id}",
                get(|UuidPathPair(id, part): UuidPathPair| async move { format!("{id}/{part}") }),
            )
    }

    async fn call(uri: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_uuid() {
        let id = Uuid::now_v7();
        let (status, body) = call(&format!("/items/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, id.to_string());
    }

    #[tokio::test]
    async fn test_invalid_uuid_is_bad_request() {
        let (status, body) = call("/items/not-a-uuid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("INVALID_UUID"));
    }

    #[tokio::test]
    async fn test_pair_in_route_order() {
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let (status, body) = call(&format!("/items/{a}/parts/{b}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("{a}/{b}"));
    }

    #[tokio::test]
    async fn test_pair_rejects_bad_second_segment() {
        let a = Uuid::now_v7();
        let (status, _) = call(&format!("/items/{a}/parts/xyz")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
