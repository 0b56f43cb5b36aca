//! HTTP API tests
//!
//! Drive the full router against the in-memory store:
//! - Order placement over the wire (status codes and JSON shapes)
//! - Bearer authentication and admin-only routes
//! - Registration and login

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use scm_backend::repository::MemoryStore;
use scm_backend::services::AuthService;
use scm_backend::{create_app, AppState, Config};

// ============================================================================
// Helpers
// ============================================================================

async fn test_app() -> Router {
    let mut config = Config::default();
    config.auth.bcrypt_cost = 4;

    let state = AppState::new(Arc::new(MemoryStore::new()), config);
    AuthService::new(state.store.clone(), &state.config)
        .ensure_default_admin(&state.config.bootstrap)
        .await
        .unwrap();

    create_app(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "Email": email, "Password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

/// Create a supplier and a 10.00 product; returns (supplier id, product id)
async fn seed_catalog(app: &Router) -> (i64, i64) {
    let (status, supplier) = send(
        app,
        Method::POST,
        "/api/suppliers",
        None,
        Some(json!({
            "Name": "Acme Parts",
            "Contact": "+1-555-0100",
            "Address": "1 Industrial Way",
            "Email": "orders@acme.example"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let supplier_id = supplier["SupplierID"].as_i64().unwrap();

    let (status, product) = send(
        app,
        Method::POST,
        "/api/products",
        None,
        Some(json!({
            "Name": "Widget",
            "Category": "Parts",
            "Price": "10.00",
            "Stock": 100,
            "SupplierID": supplier_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (supplier_id, product["ProductID"].as_i64().unwrap())
}

// ============================================================================
// Unit Tests
// ============================================================================

mod unit_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_store() {
        let app = test_app().await;
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["store"], "connected");
    }

    #[tokio::test]
    async fn test_place_order_snapshots_price() {
        let app = test_app().await;
        let (supplier_id, product_id) = seed_catalog(&app).await;

        let (status, order) = send(
            &app,
            Method::POST,
            "/api/orders",
            None,
            Some(json!({
                "SupplierID": supplier_id,
                "items": [{ "ProductID": product_id, "Quantity": 3 }]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(order["Status"], "Pending");
        assert_eq!(order["TotalAmount"], "30.00");
        assert_eq!(order["OrderItems"].as_array().unwrap().len(), 1);
        assert_eq!(order["OrderItems"][0]["ProductID"], product_id);
        assert_eq!(order["OrderItems"][0]["Quantity"], 3);
        assert_eq!(order["OrderItems"][0]["UnitPrice"], "10.00");
        assert_eq!(order["OrderItems"][0]["TotalPrice"], "30.00");

        let order_id = order["OrderID"].as_i64().unwrap();
        let (status, fetched) =
            send(&app, Method::GET, &format!("/api/orders/{}", order_id), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["TotalAmount"], "30.00");
    }

    #[tokio::test]
    async fn test_unknown_product_is_404_and_writes_nothing() {
        let app = test_app().await;
        let (supplier_id, product_id) = seed_catalog(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/orders",
            None,
            Some(json!({
                "SupplierID": supplier_id,
                "items": [
                    { "ProductID": product_id, "Quantity": 1 },
                    { "ProductID": 99999, "Quantity": 1 }
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, orders) = send(&app, Method::GET, "/api/orders", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(orders, json!([]));
    }

    #[tokio::test]
    async fn test_bad_quantities_are_400() {
        let app = test_app().await;
        let (supplier_id, product_id) = seed_catalog(&app).await;

        for quantity in [json!(0), json!(-2), json!(1.5), json!("three")] {
            let (status, body) = send(
                &app,
                Method::POST,
                "/api/orders",
                None,
                Some(json!({
                    "SupplierID": supplier_id,
                    "items": [{ "ProductID": product_id, "Quantity": quantity }]
                })),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "quantity {}", quantity);
            assert_eq!(body["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_empty_order_is_400() {
        let app = test_app().await;
        let (supplier_id, _) = seed_catalog(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/orders",
            None,
            Some(json!({ "SupplierID": supplier_id, "items": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "items");
    }

    #[tokio::test]
    async fn test_admin_routes_require_admin_token() {
        let app = test_app().await;
        let (_, product_id) = seed_catalog(&app).await;
        let uri = format!("/api/admin/products/{}", product_id);
        let update = json!({ "Price": "12.50" });

        let (status, body) = send(&app, Method::PUT, &uri, None, Some(update.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "No token provided");

        let (status, _) =
            send(&app, Method::PUT, &uri, Some("not-a-token"), Some(update.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, registered) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "Name": "Casey",
                "Email": "casey@example.com",
                "Password": "secret1",
                "Role": "Consumer"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let consumer_token = registered["token"].as_str().unwrap().to_string();

        let (status, body) =
            send(&app, Method::PUT, &uri, Some(&consumer_token), Some(update.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Access denied");

        let admin_token = login(&app, "admin@example.com", "admin123").await;
        let (status, product) = send(&app, Method::PUT, &uri, Some(&admin_token), Some(update)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(product["Price"], "12.50");
    }

    #[tokio::test]
    async fn test_user_listing_is_admin_only() {
        let app = test_app().await;

        let (status, _) = send(&app, Method::GET, "/api/users", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let admin_token = login(&app, "admin@example.com", "admin123").await;
        let (status, users) = send(&app, Method::GET, "/api/users", Some(&admin_token), None).await;
        assert_eq!(status, StatusCode::OK);

        let users = users.as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["Email"], "admin@example.com");
        assert!(users[0].get("PasswordHash").is_none());
    }

    #[tokio::test]
    async fn test_register_normalizes_role_and_rejects_duplicates() {
        let app = test_app().await;
        let body = json!({
            "Name": "Morgan",
            "Email": "morgan@example.com",
            "Password": "secret1",
            "Role": "manufacturer"
        });

        let (status, registered) =
            send(&app, Method::POST, "/api/auth/register", None, Some(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(registered["message"], "User registered successfully");
        assert_eq!(registered["user"]["Role"], "Manufacturer");
        assert!(registered["token"].as_str().is_some());

        let (status, duplicate) =
            send(&app, Method::POST, "/api/auth/register", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(duplicate["message"], "User already exists");
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let app = test_app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "Email": "admin@example.com", "Password": "wrong-password" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn test_shipment_delivery_over_http() {
        let app = test_app().await;
        let (supplier_id, product_id) = seed_catalog(&app).await;

        let (_, order) = send(
            &app,
            Method::POST,
            "/api/orders",
            None,
            Some(json!({
                "SupplierID": supplier_id,
                "items": [{ "ProductID": product_id, "Quantity": 1 }]
            })),
        )
        .await;
        let order_id = order["OrderID"].as_i64().unwrap();

        let (status, shipment) = send(
            &app,
            Method::POST,
            "/api/shipments",
            None,
            Some(json!({
                "OrderID": order_id,
                "TrackingNumber": "TRK-100",
                "Carrier": "FedEx"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(shipment["Status"], "Preparing");
        assert!(shipment["ActualDeliveryDate"].is_null());

        let uri = format!("/api/shipments/{}", shipment["ShipmentID"].as_i64().unwrap());
        let (status, delivered) = send(
            &app,
            Method::PUT,
            &uri,
            None,
            Some(json!({ "status": "Delivered" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(delivered["Status"], "Delivered");
        assert!(delivered["ActualDeliveryDate"].is_string());

        let (status, _) = send(
            &app,
            Method::PUT,
            &uri,
            None,
            Some(json!({ "status": "Teleported" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_delete_reports_message() {
        let app = test_app().await;
        let (supplier_id, _) = seed_catalog(&app).await;
        let admin_token = login(&app, "admin@example.com", "admin123").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/suppliers",
            None,
            Some(json!({
                "Name": "Spare Supplier",
                "Contact": "+1-555-0199",
                "Address": "9 Side Street",
                "Email": "spare@example.com"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let spare_id = body["SupplierID"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/admin/suppliers/{}", spare_id),
            Some(&admin_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Supplier deleted successfully");

        // Still referenced by the seeded product
        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/admin/suppliers/{}", supplier_id),
            Some(&admin_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");
    }
}
