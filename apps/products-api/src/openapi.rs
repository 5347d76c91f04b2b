//! OpenAPI documentation configuration

use axum_helpers::{ErrorResponse, HealthResponse, ReadyResponse};
use utoipa::OpenApi;

/// Combined OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Products API",
        version = "0.1.0",
        description = "Products and product options CRUD API",
        license(name = "MIT")
    ),
    paths(crate::api::health::ready_handler),
    components(schemas(ErrorResponse, HealthResponse, ReadyResponse)),
    nest(
        (path = "/api/products", api = domain_products::ApiDoc)
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
