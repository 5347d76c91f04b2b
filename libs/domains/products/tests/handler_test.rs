//! Handler tests for the Products domain
//!
//! These drive the products router directly with `oneshot`, backed by the
//! in-memory repository:
//! - Request deserialization and validation
//! - Response bodies and HTTP status codes
//! - Error responses for unknown ids

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    handlers::router(ProductService::new(InMemoryProductRepository::new()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn widget() -> Value {
    json!({
        "name": "Widget",
        "description": "d",
        "price": 10.00,
        "deliveryPrice": 2.00
    })
}

async fn create_widget(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/", Some(widget())).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_widget_lifecycle() {
    let app = app();

    let (status, created) = send(&app, "POST", "/", Some(widget())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "Widget");
    assert_eq!(created["price"], json!(10.0));
    assert_eq!(created["deliveryPrice"], json!(2.0));

    let (status, fetched) = send(&app, "GET", &format!("/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, _) = send(&app, "DELETE", &format!("/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, error) = send(&app, "GET", &format!("/{id}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_list_wraps_items_and_filters_by_name() {
    let app = app();
    create_widget(&app).await;

    let mut gadget = widget();
    gadget["name"] = json!("Gadget");
    send(&app, "POST", "/", Some(gadget)).await;

    let (status, all) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["items"].as_array().unwrap().len(), 2);

    let (_, filtered) = send(&app, "GET", "/?name=Gad", None).await;
    let items = filtered["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Gadget");

    let (_, blank) = send(&app, "GET", "/?name=", None).await;
    assert_eq!(blank["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_rejects_sub_cent_price() {
    let app = app();

    let mut body = widget();
    body["price"] = json!("10.005");
    let (status, error) = send(&app, "POST", "/", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "VALIDATION_ERROR");

    let (_, list) = send(&app, "GET", "/", None).await;
    assert!(list["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_list_is_wrapped() {
    let (status, body) = send(&app(), "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "items": [] }));
}

#[tokio::test]
async fn test_create_rejects_out_of_range_prices() {
    let app = app();

    for (price, delivery) in [(0.1, 0.0), (10_000.5, 0.0), (10.0, 250.0)] {
        let body = json!({
            "name": "Widget",
            "description": "d",
            "price": price,
            "deliveryPrice": delivery
        });
        let (status, error) = send(&app, "POST", "/", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "price {price}, delivery {delivery}");
        assert_eq!(error["error"], "VALIDATION_ERROR");
    }

    let (_, list) = send(&app, "GET", "/", None).await;
    assert!(list["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_rejects_missing_fields() {
    let (status, error) = send(&app(), "POST", "/", Some(json!({ "name": "Widget" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "INVALID_JSON");
}

#[tokio::test]
async fn test_delivery_price_defaults_to_zero() {
    let body = json!({ "name": "Widget", "description": "d", "price": 5 });
    let (status, created) = send(&app(), "POST", "/", Some(body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["deliveryPrice"], json!(0.0));
}

#[tokio::test]
async fn test_update_replaces_fields() {
    let app = app();
    let id = create_widget(&app).await;

    let replacement = json!({
        "name": "Widget Pro",
        "description": "better",
        "price": 25.5,
        "deliveryPrice": 0
    });
    let (status, _) = send(&app, "PUT", &format!("/{id}"), Some(replacement)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, fetched) = send(&app, "GET", &format!("/{id}"), None).await;
    assert_eq!(fetched["id"], json!(id));
    assert_eq!(fetched["name"], "Widget Pro");
    assert_eq!(fetched["price"], json!(25.5));
}

#[tokio::test]
async fn test_update_unknown_product_is_bad_request() {
    let app = app();
    let id = uuid::Uuid::now_v7();

    let (status, error) = send(&app, "PUT", &format!("/{id}"), Some(widget())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "NOT_FOUND");

    let (_, list) = send(&app, "GET", "/", None).await;
    assert!(list["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_unknown_product_is_bad_request() {
    let id = uuid::Uuid::now_v7();
    let (status, _) = send(&app(), "DELETE", &format!("/{id}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let (status, error) = send(&app(), "GET", "/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "INVALID_UUID");
}

#[tokio::test]
async fn test_option_lifecycle() {
    let app = app();
    let product_id = create_widget(&app).await;
    let options_uri = format!("/{product_id}/options");

    let (status, option) = send(
        &app,
        "POST",
        &options_uri,
        Some(json!({ "name": "Red", "description": "Bright red" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let option_id = option["id"].as_str().unwrap().to_string();
    let option_uri = format!("{options_uri}/{option_id}");

    let (status, listed) = send(&app, "GET", &options_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["items"], json!([option]));

    let (status, _) = send(
        &app,
        "PUT",
        &option_uri,
        Some(json!({ "name": "Green", "description": "Forest green" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, fetched) = send(&app, "GET", &option_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Green");

    let (status, _) = send(&app, "DELETE", &option_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, error) = send(&app, "GET", &option_uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_option_for_unknown_product_is_rejected() {
    let app = app();
    let product_id = uuid::Uuid::now_v7();

    let (status, error) = send(
        &app,
        "POST",
        &format!("/{product_id}/options"),
        Some(json!({ "name": "Red", "description": "Bright red" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        error["message"]
            .as_str()
            .unwrap()
            .starts_with("Cannot have a product option without a product")
    );

    let (_, listed) = send(&app, "GET", &format!("/{product_id}/options"), None).await;
    assert!(listed["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_option_description_longer_than_24_is_rejected() {
    let app = app();
    let product_id = create_widget(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/{product_id}/options"),
        Some(json!({ "name": "Red", "description": "x".repeat(25) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_option_under_wrong_product_is_untouched() {
    let app = app();
    let owner = create_widget(&app).await;
    let other = create_widget(&app).await;

    let (_, option) = send(
        &app,
        "POST",
        &format!("/{owner}/options"),
        Some(json!({ "name": "Red", "description": "Bright red" })),
    )
    .await;
    let option_id = option["id"].as_str().unwrap();

    let wrong_uri = format!("/{other}/options/{option_id}");
    let (status, _) = send(
        &app,
        "PUT",
        &wrong_uri,
        Some(json!({ "name": "Hijacked", "description": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", &wrong_uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, fetched) = send(&app, "GET", &format!("/{owner}/options/{option_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Red");
}

#[tokio::test]
async fn test_deleting_product_removes_its_options() {
    let app = app();
    let product_id = create_widget(&app).await;
    let options_uri = format!("/{product_id}/options");

    for name in ["Red", "Blue"] {
        let (status, _) = send(
            &app,
            "POST",
            &options_uri,
            Some(json!({ "name": name, "description": "colour" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = send(&app, "DELETE", &format!("/{product_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, listed) = send(&app, "GET", &options_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed["items"].as_array().unwrap().is_empty());
}
