//! # Error Types
//!
//! Domain-specific error types for kopi-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kopi-core errors (this file)                                          │
//! │  └── CoreError        - Business rule violations                       │
//! │                                                                         │
//! │  kopi-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  kopi-print errors (separate crate)                                    │
//! │  └── PrintError       - Connection and write failures                  │
//! │                                                                         │
//! │  kasir API errors (in app)                                             │
//! │  └── ApiError         - What API clients see (serialized JSON)         │
//! │                                                                         │
//! │  Flow: CoreError / DbError / PrintError → ApiError → Client            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product ID, limits, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They should be caught
/// and translated to user-friendly messages at the API boundary.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - Product ID doesn't exist in the catalog
    /// - Product was deactivated (soft delete)
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Employee cannot be found.
    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),

    /// Cart has exceeded the maximum number of distinct lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds the maximum allowed.
    ///
    /// ## When This Occurs
    /// - Adding the same product past the per-line cap
    /// - Usually a cashier typo (1000 instead of 10)
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Checkout was requested on an empty cart.
    ///
    /// ## When This Occurs
    /// - Cashier hits pay with nothing rung up
    /// - Double-submit after a successful checkout already cleared the cart
    #[error("Cannot check out an empty cart")]
    EmptyCart,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 1_000,
            max: 999,
        };
        assert_eq!(
            err.to_string(),
            "Quantity 1000 exceeds maximum allowed (999)"
        );

        let err = CoreError::CartTooLarge { max: 100 };
        assert_eq!(err.to_string(), "Cart cannot have more than 100 lines");

        let err = CoreError::EmptyCart;
        assert_eq!(err.to_string(), "Cannot check out an empty cart");
    }
}
