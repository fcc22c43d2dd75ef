//! # API Routes
//!
//! JSON API surface of the cashier app.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Route Map                                       │
//! │                                                                         │
//! │  catalog.rs          GET    /api/health                                 │
//! │                      GET    /api/products                               │
//! │                      GET    /api/employees                              │
//! │                                                                         │
//! │  cart.rs             GET    /api/cart                                   │
//! │                      POST   /api/cart/items                             │
//! │                      PATCH  /api/cart/items/:product_id                 │
//! │                      DELETE /api/cart/items/:product_id                 │
//! │                      POST   /api/cart/clear                             │
//! │                                                                         │
//! │  sale.rs             POST   /api/checkout                               │
//! │                      POST   /api/reprint                                │
//! │                      GET    /api/reports/recent                         │
//! │                      GET    /api/reports/popularity                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod catalog;
pub mod sale;

use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(catalog::health))
        .route("/api/products", get(catalog::list_products))
        .route("/api/employees", get(catalog::list_employees))
        .route("/api/cart", get(cart::get_cart))
        .route("/api/cart/items", post(cart::add_to_cart))
        .route("/api/cart/items/:product_id", patch(cart::adjust_cart_item))
        .route("/api/cart/items/:product_id", delete(cart::remove_from_cart))
        .route("/api/cart/clear", post(cart::clear_cart))
        .route("/api/checkout", post(sale::checkout))
        .route("/api/reprint", post(sale::reprint))
        .route("/api/reports/recent", get(sale::recent_transactions))
        .route("/api/reports/popularity", get(sale::product_popularity))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
