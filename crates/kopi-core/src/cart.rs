//! # Cart Module
//!
//! The in-memory shopping cart and its operations.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Operations                                  │
//! │                                                                         │
//! │  Cashier Action           Operation               Cart Change           │
//! │  ──────────────           ─────────               ───────────           │
//! │                                                                         │
//! │  Tap product ───────────► add_item() ───────────► qty += 1 or push     │
//! │                                                                         │
//! │  Tap +/- ───────────────► adjust_quantity() ────► qty = max(1, q+Δ)    │
//! │                                                                         │
//! │  Tap trash ─────────────► remove_item() ────────► line deleted          │
//! │                                                                         │
//! │  Checkout success ──────► clear() ──────────────► lines emptied         │
//! │                                                                         │
//! │  NOTE: adjust_quantity never removes a line. Dropping below one is      │
//! │        clamped to one; removal is always the explicit trash action.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Price Freezing
//! A `CartLine` snapshots the product name and effective price at the
//! moment of adding. Catalog edits after that point do not change what the
//! customer is charged.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, ReceiptItem};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One line of the cart, unique per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product ID (UUID)
    pub product_id: String,

    /// Product name at time of adding (frozen)
    pub name: String,

    /// Effective price at time of adding (frozen)
    pub unit_price: Money,

    /// Quantity in cart; always >= 1
    pub quantity: i64,
}

impl CartLine {
    /// Line total (unit price × quantity).
    pub fn subtotal(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product again
///   increases the quantity)
/// - Quantity is always >= 1 (`adjust_quantity` clamps, never removes)
/// - Maximum distinct lines: [`MAX_CART_LINES`]
/// - Maximum quantity per line: [`MAX_LINE_QUANTITY`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in the cart.
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds one unit of a product to the cart.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity += 1
    /// - Product not in cart: push a new line with quantity 1 at the
    ///   product's effective price (flat price, else cheapest variant)
    pub fn add_item(&mut self, product: &Product) -> CoreResult<()> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            let new_qty = line.quantity + 1;
            if new_qty > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines.push(CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.effective_price(),
            quantity: 1,
        });
        Ok(())
    }

    /// Removes a line from the cart by product ID.
    ///
    /// Removing a product that is not in the cart is a no-op.
    pub fn remove_item(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Adjusts a line's quantity by a signed delta.
    ///
    /// ## Behavior
    /// - `new = max(1, current + delta)`: a line never drops below one
    ///   and is never removed by this operation
    /// - Increments past the per-line cap are clamped to the cap
    /// - Unknown product IDs are a no-op
    pub fn adjust_quantity(&mut self, product_id: &str, delta: i64) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = line.quantity.saturating_add(delta).clamp(1, MAX_LINE_QUANTITY);
        }
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Takes every line out of the cart, leaving it empty.
    ///
    /// Checkout claims the cart's contents with this in a single step:
    /// a concurrent checkout then finds nothing left to sell, and lines
    /// rung up afterwards belong to the next sale.
    pub fn take_lines(&mut self) -> Vec<CartLine> {
        std::mem::take(&mut self.lines)
    }

    /// Puts previously taken lines back, merging with lines added since.
    ///
    /// Restored lines keep their original order. A product present in
    /// both sets has its quantities combined, clamped to the per-line
    /// cap. Restoring never fails; it is the undo path of a checkout
    /// whose persistence failed.
    pub fn restore_lines(&mut self, lines: Vec<CartLine>) {
        let added_since = std::mem::replace(&mut self.lines, lines);
        for line in added_since {
            match self.lines.iter_mut().find(|l| l.product_id == line.product_id) {
                Some(existing) => {
                    existing.quantity = existing
                        .quantity
                        .saturating_add(line.quantity)
                        .clamp(1, MAX_LINE_QUANTITY);
                }
                None => self.lines.push(line),
            }
        }
    }

    /// Sum of all line subtotals.
    pub fn total(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(), |acc, l| acc + l.subtotal())
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Freezes the cart lines into receipt items.
    ///
    /// Used at checkout to build the immutable `ReceiptData` snapshot.
    pub fn receipt_items(&self) -> Vec<ReceiptItem> {
        self.lines
            .iter()
            .map(|l| ReceiptItem {
                name: l.name.clone(),
                qty: l.quantity,
                price: l.unit_price,
                subtotal: l.subtotal(),
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductVariant;

    fn flat_product(id: &str, price: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price: Some(Money::from_rupiah(price)),
            variants: vec![],
            category: "Coffee".to_string(),
            is_active: true,
        }
    }

    fn variant_product(id: &str, prices: &[i64]) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price: None,
            variants: prices
                .iter()
                .map(|p| ProductVariant {
                    size: format!("Size-{}", p),
                    price: Money::from_rupiah(*p),
                })
                .collect(),
            category: "Coffee".to_string(),
            is_active: true,
        }
    }

    #[test]
    fn test_add_item_new_line() {
        let mut cart = Cart::new();
        let product = flat_product("1", 10_000);

        cart.add_item(&product).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines[0].quantity, 1);
        assert_eq!(cart.total().rupiah(), 10_000);
    }

    #[test]
    fn test_add_same_product_increments_quantity() {
        let mut cart = Cart::new();
        let product = flat_product("1", 10_000);

        cart.add_item(&product).unwrap();
        cart.add_item(&product).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines[0].quantity, 2);
        assert_eq!(cart.total().rupiah(), 20_000);
    }

    #[test]
    fn test_add_uses_cheapest_variant_price() {
        let mut cart = Cart::new();
        let product = variant_product("1", &[18_000, 14_000]);

        cart.add_item(&product).unwrap();

        assert_eq!(cart.lines[0].unit_price.rupiah(), 14_000);
    }

    #[test]
    fn test_add_past_quantity_cap_errors() {
        let mut cart = Cart::new();
        let product = flat_product("1", 5_000);

        cart.add_item(&product).unwrap();
        cart.lines[0].quantity = MAX_LINE_QUANTITY;

        let err = cart.add_item(&product).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
        assert_eq!(cart.lines[0].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_add_past_line_cap_errors() {
        let mut cart = Cart::new();
        for i in 0..MAX_CART_LINES {
            cart.add_item(&flat_product(&i.to_string(), 1_000)).unwrap();
        }

        let overflow = flat_product("overflow", 1_000);
        let err = cart.add_item(&overflow).unwrap_err();
        assert!(matches!(err, CoreError::CartTooLarge { .. }));
        assert_eq!(cart.line_count(), MAX_CART_LINES);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(&flat_product("1", 10_000)).unwrap();
        cart.add_item(&flat_product("2", 5_000)).unwrap();

        cart.remove_item("1");

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines[0].product_id, "2");
    }

    #[test]
    fn test_remove_unknown_product_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&flat_product("1", 10_000)).unwrap();

        cart.remove_item("missing");

        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_adjust_quantity_up_and_down() {
        let mut cart = Cart::new();
        cart.add_item(&flat_product("1", 10_000)).unwrap();

        cart.adjust_quantity("1", 2);
        assert_eq!(cart.lines[0].quantity, 3);

        cart.adjust_quantity("1", -1);
        assert_eq!(cart.lines[0].quantity, 2);
    }

    #[test]
    fn test_adjust_quantity_clamps_at_one() {
        let mut cart = Cart::new();
        cart.add_item(&flat_product("1", 10_000)).unwrap();
        cart.adjust_quantity("1", 2); // quantity is now 3

        cart.adjust_quantity("1", -999);

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines[0].quantity, 1);
    }

    #[test]
    fn test_adjust_quantity_clamps_at_cap() {
        let mut cart = Cart::new();
        cart.add_item(&flat_product("1", 10_000)).unwrap();

        cart.adjust_quantity("1", i64::MAX - 1);

        assert_eq!(cart.lines[0].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(&flat_product("1", 10_000)).unwrap();
        assert!(!cart.is_empty());

        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.total().is_zero());
    }

    #[test]
    fn test_take_lines_empties_cart() {
        let mut cart = Cart::new();
        cart.add_item(&flat_product("1", 10_000)).unwrap();

        let taken = cart.take_lines();

        assert_eq!(taken.len(), 1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_restore_lines_merges_additions() {
        let mut cart = Cart::new();
        let kopi = flat_product("1", 10_000);
        cart.add_item(&kopi).unwrap();
        cart.add_item(&flat_product("2", 8_000)).unwrap();

        let taken = cart.take_lines();
        // Rung up while the taken lines were out
        cart.add_item(&kopi).unwrap();
        cart.add_item(&flat_product("3", 5_000)).unwrap();

        cart.restore_lines(taken);

        assert_eq!(cart.line_count(), 3);
        assert_eq!(cart.lines[0].product_id, "1");
        assert_eq!(cart.lines[0].quantity, 2);
        assert_eq!(cart.total().rupiah(), 33_000);
    }

    #[test]
    fn test_total_across_lines() {
        let mut cart = Cart::new();
        let kopi = flat_product("1", 10_000);
        cart.add_item(&kopi).unwrap();
        cart.add_item(&kopi).unwrap();
        cart.add_item(&flat_product("2", 8_000)).unwrap();

        assert_eq!(cart.total().rupiah(), 28_000);
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_receipt_items_snapshot() {
        let mut cart = Cart::new();
        let kopi = flat_product("1", 10_000);
        cart.add_item(&kopi).unwrap();
        cart.add_item(&kopi).unwrap();

        let items = cart.receipt_items();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].qty, 2);
        assert_eq!(items[0].price.rupiah(), 10_000);
        assert_eq!(items[0].subtotal.rupiah(), 20_000);
    }
}
