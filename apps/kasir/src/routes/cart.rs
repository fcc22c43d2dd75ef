//! # Cart Routes
//!
//! Handlers for cart manipulation.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Payment  │────►│ Recorded │       │
//! │  │  Cart    │     │          │     │  Picker  │     │   Sale   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart        checkout                          │
//! │                   adjust_cart_item   (sale.rs)                         │
//! │                   remove_from_cart                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use kopi_core::{Cart, CartLine, Money};

use crate::error::ApiError;
use crate::state::AppState;

/// Cart response including lines and computed totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub total: Money,
    pub total_quantity: i64,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            lines: cart.lines.clone(),
            total: cart.total(),
            total_quantity: cart.total_quantity(),
        }
    }
}

/// Request body for adding a product to the cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
}

/// Request body for adjusting a line quantity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustItemRequest {
    /// Signed change, typically +1 or -1 from the quantity steppers.
    pub delta: i64,
}

/// Gets the current cart contents.
pub async fn get_cart(State(state): State<AppState>) -> Json<CartResponse> {
    debug!("get_cart");
    Json(state.cart.with_cart(|cart| CartResponse::from(cart)))
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - Product already in cart: quantity increases by one
/// - Product not in cart: new line at the product's effective price
/// - Price is frozen at time of adding
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    debug!(product_id = %request.product_id, "add_to_cart");

    let product = state
        .db
        .products()
        .get_by_id(&request.product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &request.product_id))?;

    if !product.is_active {
        return Err(ApiError::validation("Product is not available for sale"));
    }

    state.cart.with_cart_mut(|cart| {
        cart.add_item(&product)?;
        Ok(Json(CartResponse::from(&*cart)))
    })
}

/// Adjusts a line's quantity by a signed delta.
///
/// ## Behavior
/// - Quantity never drops below 1; use DELETE to remove a line
/// - Quantity is capped at the per-line maximum
/// - Unknown product id is a no-op
pub async fn adjust_cart_item(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(request): Json<AdjustItemRequest>,
) -> Json<CartResponse> {
    debug!(product_id = %product_id, delta = %request.delta, "adjust_cart_item");

    Json(state.cart.with_cart_mut(|cart| {
        cart.adjust_quantity(&product_id, request.delta);
        CartResponse::from(&*cart)
    }))
}

/// Removes a line from the cart. Removing an absent line is a no-op.
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Json<CartResponse> {
    debug!(product_id = %product_id, "remove_from_cart");

    Json(state.cart.with_cart_mut(|cart| {
        cart.remove_item(&product_id);
        CartResponse::from(&*cart)
    }))
}

/// Empties the cart.
///
/// ## When Used
/// - Cashier cancels the order
/// - (Checkout takes the cart's lines itself on success)
pub async fn clear_cart(State(state): State<AppState>) -> Json<CartResponse> {
    debug!("clear_cart");

    Json(state.cart.with_cart_mut(|cart| {
        cart.clear();
        CartResponse::from(&*cart)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CartState;
    use kopi_core::Product;

    fn product(id: &str, name: &str, price: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            price: Some(Money::from_rupiah(price)),
            variants: vec![],
            category: "Coffee".to_string(),
            is_active: true,
        }
    }

    #[test]
    fn test_cart_response_from_shared_state() {
        let cart = CartState::new();
        let kopi = product("p1", "Es Kopi Susu", 10_000);
        cart.with_cart_mut(|c| {
            c.add_item(&kopi).unwrap();
            c.add_item(&kopi).unwrap();
        });

        // Same shape the GET handler produces.
        let response = cart.with_cart(|cart| CartResponse::from(cart));

        assert_eq!(response.lines.len(), 1);
        assert_eq!(response.total_quantity, 2);
        assert_eq!(response.total.rupiah(), 20_000);
    }

    #[test]
    fn test_empty_cart_response() {
        let cart = CartState::new();

        let response = cart.with_cart(|cart| CartResponse::from(cart));

        assert!(response.lines.is_empty());
        assert_eq!(response.total_quantity, 0);
        assert_eq!(response.total, Money::zero());
    }
}
