//! # Shared State
//!
//! State shared across API handlers.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Multiple handlers may access/modify the cart
//! 2. Only one handler should modify the cart at a time
//! 3. axum handlers run concurrently
//!
//! Cart operations are synchronous and quick, so a `std::sync::Mutex` is
//! held only for the duration of the closure, never across an await.

use std::sync::{Arc, Mutex};

use kopi_core::Cart;
use kopi_db::Database;

use crate::checkout::CheckoutService;

/// Shared cart state.
///
/// ## Why Not RwLock?
/// Cart operations are typically quick, and most operations modify state.
/// A RwLock would add complexity with minimal benefit.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let total = cart_state.with_cart(|cart| cart.total());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = match self.cart.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_item(&product))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = match self.cart.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut cart)
    }
}

/// Application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database handle (cheap to clone, pool inside).
    pub db: Database,

    /// The shared cart.
    pub cart: CartState,

    /// Checkout orchestration (persist, print, reprint).
    pub checkout: Arc<CheckoutService>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kopi_core::{Money, Product};

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price: Some(Money::from_rupiah(price)),
            variants: vec![],
            category: "Coffee".to_string(),
            is_active: true,
        }
    }

    #[test]
    fn test_cart_state_shares_one_cart() {
        let state = CartState::new();
        let clone = state.clone();

        state
            .with_cart_mut(|cart| cart.add_item(&product("1", 10_000)))
            .unwrap();

        assert_eq!(clone.with_cart(|cart| cart.total().rupiah()), 10_000);
    }
}
