//! # kopi-core: Pure Business Logic for Kopi POS
//!
//! This crate is the **heart** of Kopi POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Kopi POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    kasir HTTP API (axum)                        │   │
//! │  │    product list ──► cart ops ──► checkout ──► receipt           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kopi-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │   error   │   │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │ CoreError │   │   │
//! │  │   │  Receipt  │  │  Rp fmt   │  │ CartLine  │  │           │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO BLUETOOTH • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │       ┌────────────────────────┴──────────────────────┐                │
//! │       ▼                                               ▼                │
//! │  ┌───────────────────────┐              ┌──────────────────────────┐   │
//! │  │  kopi-db (SQLite)     │              │  kopi-print (ESC/POS)    │   │
//! │  └───────────────────────┘              └──────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Employee, ReceiptData, etc.)
//! - [`money`] - Rupiah money type with integer arithmetic (no floating point!)
//! - [`cart`] - The shopping cart and its operations
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are whole rupiah (i64), never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use kopi_core::Money` instead of
// `use kopi_core::money::Money`

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in the cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Cashier name used when no employee is selected at checkout.
pub const DEFAULT_CASHIER: &str = "Kasir Default";
