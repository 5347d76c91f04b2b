use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AuditEvent, AuditOutcome, UuidPath, UuidPathPair, ValidatedJson,
    errors::responses::{
        BadRequestNotFoundResponse, BadRequestValidationResponse, InternalServerErrorResponse,
    },
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::dto::{
    ProductDto, ProductOptionDto, ProductOptionsDto, ProductsDto, UpsertProduct, UpsertProductOption,
};
use crate::error::ProductResult;
use crate::models::ProductFilter;
use crate::repository::ProductRepository;
use crate::service::ProductService;

pub const TAG: &str = "Products";

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
        list_options,
        create_option,
        get_option,
        update_option,
        delete_option,
    ),
    components(
        schemas(
            ProductDto,
            ProductsDto,
            ProductOptionDto,
            ProductOptionsDto,
            UpsertProduct,
            UpsertProductOption
        ),
        responses(
            BadRequestNotFoundResponse,
            BadRequestValidationResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Products and their options")
    )
)]
pub struct ApiDoc;

type SharedService<R> = State<Arc<ProductService<R>>>;

/// Create the products router. Mount it under `/products`.
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/options", get(list_options).post(create_option))
        .route(
            "/{id}/options/{option_id}",
            get(get_option).put(update_option).delete(delete_option),
        )
        .with_state(shared_service)
}

/// List products, optionally filtered by name
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ProductFilter),
    responses(
        (status = 200, description = "Products in creation order", body = ProductsDto),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): SharedService<R>,
    Query(filter): Query<ProductFilter>,
) -> ProductResult<Json<ProductsDto>> {
    let products = service.search_products(filter).await?;
    Ok(Json(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = UpsertProduct,
    responses(
        (status = 201, description = "Product created", body = ProductDto),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): SharedService<R>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<UpsertProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;

    AuditEvent::new("product.create", format!("product:{}", product.id), AuditOutcome::Success)
        .with_client(&headers)
        .with_details(json!({ "name": product.name }))
        .log();

    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductDto),
        (status = 400, response = BadRequestNotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<ProductDto>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Replace a product's fields
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpsertProduct,
    responses(
        (status = 204, description = "Product updated"),
        (status = 400, response = BadRequestNotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): SharedService<R>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpsertProduct>,
) -> ProductResult<StatusCode> {
    service.update_product(id, input).await?;

    AuditEvent::new("product.update", format!("product:{id}"), AuditOutcome::Success)
        .with_client(&headers)
        .log();

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a product and all of its options
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestNotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): SharedService<R>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> ProductResult<StatusCode> {
    service.delete_product(id).await?;

    AuditEvent::new("product.delete", format!("product:{id}"), AuditOutcome::Success)
        .with_client(&headers)
        .log();

    Ok(StatusCode::NO_CONTENT)
}

/// List a product's options
#[utoipa::path(
    get,
    path = "/{id}/options",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Options in creation order", body = ProductOptionsDto),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_options<R: ProductRepository>(
    State(service): SharedService<R>,
    UuidPath(product_id): UuidPath,
) -> ProductResult<Json<ProductOptionsDto>> {
    let options = service.list_options(product_id).await?;
    Ok(Json(options))
}

/// Add an option to a product
#[utoipa::path(
    post,
    path = "/{id}/options",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpsertProductOption,
    responses(
        (status = 201, description = "Option created", body = ProductOptionDto),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_option<R: ProductRepository>(
    State(service): SharedService<R>,
    headers: HeaderMap,
    UuidPath(product_id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpsertProductOption>,
) -> ProductResult<impl IntoResponse> {
    let option = service.create_option(product_id, input).await?;

    AuditEvent::new(
        "product_option.create",
        format!("product:{product_id}/option:{}", option.id),
        AuditOutcome::Success,
    )
    .with_client(&headers)
    .with_details(json!({ "name": option.name }))
    .log();

    Ok((StatusCode::CREATED, Json(option)))
}

/// Get one of a product's options
#[utoipa::path(
    get,
    path = "/{id}/options/{option_id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("option_id" = Uuid, Path, description = "Option ID")
    ),
    responses(
        (status = 200, description = "Option found", body = ProductOptionDto),
        (status = 400, response = BadRequestNotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_option<R: ProductRepository>(
    State(service): SharedService<R>,
    UuidPathPair(product_id, option_id): UuidPathPair,
) -> ProductResult<Json<ProductOptionDto>> {
    let option = service.get_option(product_id, option_id).await?;
    Ok(Json(option))
}

/// Replace an option's fields
#[utoipa::path(
    put,
    path = "/{id}/options/{option_id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("option_id" = Uuid, Path, description = "Option ID")
    ),
    request_body = UpsertProductOption,
    responses(
        (status = 204, description = "Option updated"),
        (status = 400, response = BadRequestNotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_option<R: ProductRepository>(
    State(service): SharedService<R>,
    headers: HeaderMap,
    UuidPathPair(product_id, option_id): UuidPathPair,
    ValidatedJson(input): ValidatedJson<UpsertProductOption>,
) -> ProductResult<StatusCode> {
    service.update_option(product_id, option_id, input).await?;

    AuditEvent::new(
        "product_option.update",
        format!("product:{product_id}/option:{option_id}"),
        AuditOutcome::Success,
    )
    .with_client(&headers)
    .log();

    Ok(StatusCode::NO_CONTENT)
}

/// Delete one of a product's options
#[utoipa::path(
    delete,
    path = "/{id}/options/{option_id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("option_id" = Uuid, Path, description = "Option ID")
    ),
    responses(
        (status = 204, description = "Option deleted"),
        (status = 400, response = BadRequestNotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_option<R: ProductRepository>(
    State(service): SharedService<R>,
    headers: HeaderMap,
    UuidPathPair(product_id, option_id): UuidPathPair,
) -> ProductResult<StatusCode> {
    service.delete_option(product_id, option_id).await?;

    AuditEvent::new(
        "product_option.delete",
        format!("product:{product_id}/option:{option_id}"),
        AuditOutcome::Success,
    )
    .with_client(&headers)
    .log();

    Ok(StatusCode::NO_CONTENT)
}
