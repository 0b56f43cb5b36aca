//! Route definitions for the Supply Chain Management Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{
    handlers,
    middleware::{auth_middleware, require_admin},
    AppState,
};

/// Create API routes
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Public catalog and order routes
        .nest("/suppliers", supplier_routes())
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .nest("/shipments", shipment_routes())
        // Protected routes - user listing
        .nest("/users", user_routes(state))
        // Protected routes - admin maintenance
        .nest("/admin", admin_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
}

fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route("/:id", get(handlers::get_supplier))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route("/low-stock", get(handlers::list_low_stock_products))
        .route("/:id", get(handlers::get_product))
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::place_order))
        .route("/:id", get(handlers::get_order))
}

fn shipment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_shipments).post(handlers::create_shipment),
        )
        .route(
            "/:id",
            get(handlers::get_shipment).put(handlers::update_shipment_status),
        )
}

/// User listing (admin only)
fn user_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}

/// Admin maintenance routes
///
/// `require_admin` is added first so it runs inside `auth_middleware`.
fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/products/:id",
            put(handlers::update_product).delete(handlers::delete_product),
        )
        .route(
            "/suppliers/:id",
            put(handlers::update_supplier).delete(handlers::delete_supplier),
        )
        .route(
            "/orders/:id",
            put(handlers::update_order).delete(handlers::delete_order),
        )
        .route(
            "/shipments/:id",
            put(handlers::update_shipment).delete(handlers::delete_shipment),
        )
        .route("/users", get(handlers::list_users))
        .route(
            "/users/:id",
            put(handlers::update_user).delete(handlers::delete_user),
        )
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}
