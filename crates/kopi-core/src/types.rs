//! # Domain Types
//!
//! Core domain types used throughout Kopi POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    Product      │   │   ReceiptData   │   │ AnalyticRecord  │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id (UUID)      │   │  transaction_id │   │  product_id     │        │
//! │  │  name           │   │  items[]        │   │  quantity       │        │
//! │  │  price/variants │   │  subtotal,total │   │  total          │        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │    Employee     │   │ PaymentMethod   │                              │
//! │  │  ─────────────  │   │  ─────────────  │                              │
//! │  │  id, name       │   │  Cash ("Tunai") │                              │
//! │  │  is_active      │   │  Qris, Transfer │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `ReceiptData` freezes names and prices at checkout time. The sale
//! history stays consistent even if the catalog changes afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A size variant of a product (e.g., "Regular" / "Large").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Variant label shown to the cashier ("Regular", "Large", ...).
    pub size: String,

    /// Price of this variant in whole rupiah.
    pub price: Money,
}

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Flat price, if the product has no size variants.
    pub price: Option<Money>,

    /// Size variants. A product has either a flat price or variants.
    pub variants: Vec<ProductVariant>,

    /// Menu category ("Coffee", "Non-Coffee", "Snack", ...).
    pub category: String,

    /// Whether product is sellable (soft delete).
    pub is_active: bool,
}

impl Product {
    /// Resolves the price used when this product is added to the cart.
    ///
    /// ## Resolution Order
    /// 1. Flat price, when set
    /// 2. Lowest-priced variant otherwise
    /// 3. Zero when the product has neither (defensively unsellable data)
    pub fn effective_price(&self) -> Money {
        if let Some(price) = self.price {
            return price;
        }
        self.variants
            .iter()
            .map(|v| v.price)
            .min()
            .unwrap_or_else(Money::zero)
    }
}

// =============================================================================
// Employee
// =============================================================================

/// A staff member who can be selected as the cashier on duty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    /// Inactive employees are hidden from the cashier picker.
    pub is_active: bool,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash ("Tunai").
    Cash,
    /// QRIS code scan.
    Qris,
    /// Bank transfer.
    Transfer,
}

impl PaymentMethod {
    /// Receipt label, matching the labels the shop uses on printed receipts.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Tunai",
            PaymentMethod::Qris => "QRIS",
            PaymentMethod::Transfer => "Transfer",
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

// =============================================================================
// Receipt Data
// =============================================================================

/// A named discount applied to a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub name: String,
    pub amount: Money,
}

/// One printed line of a receipt.
///
/// Snapshot of a cart line at checkout time: name and price are frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub name: String,
    pub qty: i64,
    /// Unit price at time of sale (frozen).
    pub price: Money,
    /// Line total (price × qty).
    pub subtotal: Money,
}

/// The contract between checkout and printing.
///
/// ## Invariant
/// `total == subtotal - discount.amount` (or `total == subtotal` with no
/// discount). The constructor computes `total`, so the invariant holds by
/// construction; there is no way to build a receipt that violates it.
///
/// ## Immutability
/// All fields are read-only after construction. Reprinting re-encodes the
/// same value and must produce byte-identical output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptData {
    /// Unique sale token, "TRX-" followed by a UUID v4.
    pub transaction_id: String,

    /// When the sale happened.
    pub timestamp: DateTime<Utc>,

    /// Frozen line items.
    pub items: Vec<ReceiptItem>,

    /// Sum of line subtotals.
    pub subtotal: Money,

    /// Optional discount. Printed only when `amount > 0`.
    pub discount: Option<Discount>,

    /// Amount due: `subtotal - discount`.
    pub total: Money,

    /// How the customer paid.
    pub payment_method: PaymentMethod,

    /// Cashier on duty, if one was selected.
    pub employee_name: Option<String>,
}

impl ReceiptData {
    /// Builds a receipt, computing `total` from `subtotal` and `discount`.
    pub fn new(
        transaction_id: String,
        timestamp: DateTime<Utc>,
        items: Vec<ReceiptItem>,
        subtotal: Money,
        discount: Option<Discount>,
        payment_method: PaymentMethod,
        employee_name: Option<String>,
    ) -> Self {
        let total = subtotal - discount.as_ref().map(|d| d.amount).unwrap_or_default();
        ReceiptData {
            transaction_id,
            timestamp,
            items,
            subtotal,
            discount,
            total,
            payment_method,
            employee_name,
        }
    }

    /// Cashier name for display: the selected employee or "-".
    pub fn cashier_label(&self) -> &str {
        self.employee_name.as_deref().unwrap_or("-")
    }
}

// =============================================================================
// Analytic Record
// =============================================================================

/// One per-product row written alongside every sale.
///
/// These rows feed the popularity/velocity reporting views. They carry the
/// product name redundantly so reports survive catalog renames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticRecord {
    pub id: String,
    /// Product name at time of sale (frozen).
    pub item: String,
    pub product_id: String,
    pub quantity: i64,
    /// Line total for this product in the sale.
    pub total: Money,
    /// Record kind; always "sale" for checkout-produced rows.
    pub kind: String,
    pub employee_name: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
