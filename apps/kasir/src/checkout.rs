//! # Checkout Orchestration
//!
//! Turns a cart into a persisted sale and (best-effort) a printed receipt.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         checkout()                                      │
//! │                                                                         │
//! │  1. Take the cart's lines ── empty? ──► Err(EmptyCart), no effects     │
//! │          │                                                              │
//! │  2. Mint "TRX-" + UUIDv4, freeze ReceiptData + analytic rows           │
//! │          │                                                              │
//! │  3. Persist (ONE transaction) ── fails? ──► Err(Persistence),          │
//! │          │                                   lines restored to cart     │
//! │  4. Remember receipt for reprint                                       │
//! │          │                                                              │
//! │  5. Print ── ok? ──────► PrintStatus::Printed                          │
//! │          ├── skipped? ─► PrintStatus::Skipped  (null printer)          │
//! │          └── failed? ──► PrintStatus::Failed   (sale stands,           │
//! │                                                 reprint offered)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Step 1 removes the lines from the cart in a single lock. A concurrent
//! checkout therefore finds an empty cart instead of selling the same
//! lines twice, and a line rung up while step 3 is in flight belongs to
//! the next sale rather than being wiped when this one completes. The
//! failure path merges the taken lines back with anything added since.
//!
//! The persistence boundary is the point of no return: before it, failure
//! puts the cart back the way it was; after it, the sale exists no matter
//! what the printer does.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use kopi_core::{
    AnalyticRecord, Money, PaymentMethod, ReceiptData, ReceiptItem, DEFAULT_CASHIER,
};
use kopi_db::{Database, DbError};
use kopi_print::{PrintOutcome, PrinterTransport};

use crate::state::CartState;

// =============================================================================
// Sales Ledger
// =============================================================================

/// Where checkouts are durably recorded.
///
/// The production implementation is [`Database`]; tests swap in a mock to
/// exercise the orchestration without SQLite.
#[async_trait]
pub trait SalesLedger: Send + Sync {
    /// Persists one sale and its analytic rows atomically.
    async fn record_checkout(
        &self,
        receipt: &ReceiptData,
        analytics: &[AnalyticRecord],
    ) -> Result<(), DbError>;
}

#[async_trait]
impl SalesLedger for Database {
    async fn record_checkout(
        &self,
        receipt: &ReceiptData,
        analytics: &[AnalyticRecord],
    ) -> Result<(), DbError> {
        self.sales().record_checkout(receipt, analytics).await
    }
}

// =============================================================================
// Outcome Types
// =============================================================================

/// What happened to the receipt after the sale was saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrintStatus {
    /// The receipt reached the printer.
    Printed,
    /// No printer is configured.
    Skipped,
    /// Printing failed; the sale stands and a reprint is offered.
    Failed,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOutcome {
    /// The frozen receipt, already persisted.
    pub receipt: ReceiptData,

    /// Whether the paper copy made it out.
    pub print_status: PrintStatus,
}

/// Checkout failures. All of them leave the cart intact.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was requested on an empty cart.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// The sale could not be persisted; nothing was written.
    #[error("Failed to persist sale: {0}")]
    Persistence(#[from] DbError),

    /// Reprint was requested before any successful checkout.
    #[error("No receipt available to reprint")]
    NothingToReprint,
}

// =============================================================================
// Checkout Service
// =============================================================================

/// Orchestrates checkout: validate, persist, clear, print, reprint.
pub struct CheckoutService {
    ledger: Arc<dyn SalesLedger>,
    printer: Arc<dyn PrinterTransport>,
    cart: CartState,
    /// Receipt of the last successful checkout, kept for reprinting.
    last_receipt: Mutex<Option<ReceiptData>>,
}

impl CheckoutService {
    /// Creates a checkout service over the given ledger, printer, and cart.
    pub fn new(
        ledger: Arc<dyn SalesLedger>,
        printer: Arc<dyn PrinterTransport>,
        cart: CartState,
    ) -> Self {
        CheckoutService {
            ledger,
            printer,
            cart,
            last_receipt: Mutex::new(None),
        }
    }

    /// Runs a checkout for the current cart.
    pub async fn checkout(
        &self,
        payment_method: PaymentMethod,
        employee_name: Option<String>,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        // Claim the cart's lines in one lock. From here on this sale owns
        // them: a concurrent checkout sees an empty cart, and anything
        // rung up while we persist belongs to the next sale.
        let lines = self.cart.with_cart_mut(|cart| cart.take_lines());
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let transaction_id = format!("TRX-{}", Uuid::new_v4());
        let now = Utc::now();
        let subtotal = lines
            .iter()
            .fold(Money::zero(), |acc, l| acc + l.subtotal());
        let employee_name =
            employee_name.unwrap_or_else(|| DEFAULT_CASHIER.to_string());

        let receipt = ReceiptData::new(
            transaction_id,
            now,
            lines
                .iter()
                .map(|l| ReceiptItem {
                    name: l.name.clone(),
                    qty: l.quantity,
                    price: l.unit_price,
                    subtotal: l.subtotal(),
                })
                .collect(),
            subtotal,
            None,
            payment_method,
            Some(employee_name.clone()),
        );

        let analytics: Vec<AnalyticRecord> = lines
            .iter()
            .map(|l| AnalyticRecord {
                id: Uuid::new_v4().to_string(),
                item: l.name.clone(),
                product_id: l.product_id.clone(),
                quantity: l.quantity,
                total: l.subtotal(),
                kind: "sale".to_string(),
                employee_name: employee_name.clone(),
                created_at: now,
            })
            .collect();

        // Point of no return. On failure the taken lines go back into the
        // cart, merged with whatever was rung up in the meantime.
        if let Err(err) = self.ledger.record_checkout(&receipt, &analytics).await {
            self.cart.with_cart_mut(|cart| cart.restore_lines(lines));
            return Err(err.into());
        }
        info!(
            transaction_id = %receipt.transaction_id,
            total = %receipt.total,
            "Sale recorded"
        );

        *self.last_receipt.lock().await = Some(receipt.clone());

        let print_status = self.deliver(&receipt).await;
        Ok(CheckoutOutcome {
            receipt,
            print_status,
        })
    }

    /// Re-sends the last successful checkout's receipt.
    ///
    /// Reprints re-encode the stored receipt, so the paper copy is
    /// byte-identical to the original.
    pub async fn reprint(&self) -> Result<PrintStatus, CheckoutError> {
        let receipt = self
            .last_receipt
            .lock()
            .await
            .clone()
            .ok_or(CheckoutError::NothingToReprint)?;

        Ok(self.deliver(&receipt).await)
    }

    /// Best-effort print; never fails the caller.
    async fn deliver(&self, receipt: &ReceiptData) -> PrintStatus {
        match self.printer.print(receipt).await {
            Ok(PrintOutcome::Printed) => PrintStatus::Printed,
            Ok(PrintOutcome::Skipped) => PrintStatus::Skipped,
            Err(err) => {
                warn!(
                    transaction_id = %receipt.transaction_id,
                    error = %err,
                    "Receipt printing failed, sale is saved"
                );
                PrintStatus::Failed
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use tokio::sync::oneshot;

    use kopi_core::{Money, Product};
    use kopi_print::{PrintError, PrintResult};

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

    /// Ledger that records calls in memory and can be told to fail.
    #[derive(Default)]
    struct MockLedger {
        fail: AtomicBool,
        recorded: Mutex<Vec<(ReceiptData, Vec<AnalyticRecord>)>>,
    }

    #[async_trait]
    impl SalesLedger for MockLedger {
        async fn record_checkout(
            &self,
            receipt: &ReceiptData,
            analytics: &[AnalyticRecord],
        ) -> Result<(), DbError> {
            // Yield once so concurrently joined checkouts interleave here,
            // the way a real database write suspends the task.
            tokio::task::yield_now().await;
            if self.fail.load(Ordering::SeqCst) {
                return Err(DbError::TransactionFailed("disk full".to_string()));
            }
            self.recorded
                .lock()
                .await
                .push((receipt.clone(), analytics.to_vec()));
            Ok(())
        }
    }

    /// Ledger that signals when persistence starts and waits for the test
    /// to release it, so the test can act mid-checkout.
    struct GatedLedger {
        entered: Mutex<Option<oneshot::Sender<()>>>,
        gate: Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl SalesLedger for GatedLedger {
        async fn record_checkout(
            &self,
            _receipt: &ReceiptData,
            _analytics: &[AnalyticRecord],
        ) -> Result<(), DbError> {
            if let Some(tx) = self.entered.lock().await.take() {
                let _ = tx.send(());
            }
            if let Some(rx) = self.gate.lock().await.take() {
                let _ = rx.await;
            }
            Ok(())
        }
    }

    /// Printer that counts prints and can be told to fail.
    #[derive(Default)]
    struct MockPrinter {
        fail: AtomicBool,
        printed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PrinterTransport for MockPrinter {
        async fn print(&self, receipt: &ReceiptData) -> PrintResult<PrintOutcome> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(PrintError::DeviceNotFound {
                    waited: Duration::from_secs(10),
                });
            }
            self.printed
                .lock()
                .await
                .push(receipt.transaction_id.clone());
            Ok(PrintOutcome::Printed)
        }
    }

    struct Harness {
        ledger: Arc<MockLedger>,
        printer: Arc<MockPrinter>,
        cart: CartState,
        service: CheckoutService,
    }

    fn harness() -> Harness {
        let ledger = Arc::new(MockLedger::default());
        let printer = Arc::new(MockPrinter::default());
        let cart = CartState::new();
        let service = CheckoutService::new(
            ledger.clone(),
            printer.clone(),
            cart.clone(),
        );
        Harness {
            ledger,
            printer,
            cart,
            service,
        }
    }

    fn ring_up(cart: &CartState) {
        // Es Kopi Susu x2 @ 10.000, Roti Bakar x1 @ 8.000
        let kopi = product("p1", "Es Kopi Susu", 10_000);
        let roti = product("p2", "Roti Bakar", 8_000);
        cart.with_cart_mut(|c| {
            c.add_item(&kopi).unwrap();
            c.add_item(&kopi).unwrap();
            c.add_item(&roti).unwrap();
        });
    }

    #[tokio::test]
    async fn test_empty_cart_fails_fast() {
        let h = harness();

        let err = h
            .service
            .checkout(PaymentMethod::Cash, None)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert!(h.ledger.recorded.lock().await.is_empty());
        assert!(h.printer.printed.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_checkout_happy_path() {
        let h = harness();
        ring_up(&h.cart);

        let outcome = h
            .service
            .checkout(PaymentMethod::Cash, Some("Sari".to_string()))
            .await
            .unwrap();

        // Total equals the sum of line totals.
        assert_eq!(outcome.receipt.total.rupiah(), 28_000);
        assert_eq!(outcome.receipt.subtotal, outcome.receipt.total);
        assert!(outcome.receipt.transaction_id.starts_with("TRX-"));
        assert_eq!(outcome.print_status, PrintStatus::Printed);

        // One sale with one analytic row per distinct product.
        let recorded = h.ledger.recorded.lock().await;
        assert_eq!(recorded.len(), 1);
        let (receipt, analytics) = &recorded[0];
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(analytics.len(), 2);
        assert_eq!(analytics[0].quantity, 2);
        assert_eq!(analytics[0].total.rupiah(), 20_000);
        assert_eq!(analytics[0].employee_name, "Sari");
        assert!(analytics.iter().all(|a| a.kind == "sale"));

        // Cart was cleared on success.
        assert!(h.cart.with_cart(|c| c.is_empty()));
    }

    #[tokio::test]
    async fn test_unique_transaction_ids() {
        let h = harness();

        ring_up(&h.cart);
        let first = h.service.checkout(PaymentMethod::Cash, None).await.unwrap();
        ring_up(&h.cart);
        let second = h.service.checkout(PaymentMethod::Cash, None).await.unwrap();

        assert_ne!(
            first.receipt.transaction_id,
            second.receipt.transaction_id
        );
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_cart() {
        let h = harness();
        ring_up(&h.cart);
        h.ledger.fail.store(true, Ordering::SeqCst);

        let err = h
            .service
            .checkout(PaymentMethod::Qris, None)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Persistence(_)));
        // Cart intact for retry, nothing printed, nothing to reprint.
        assert_eq!(h.cart.with_cart(|c| c.total().rupiah()), 28_000);
        assert!(h.printer.printed.lock().await.is_empty());
        assert!(matches!(
            h.service.reprint().await.unwrap_err(),
            CheckoutError::NothingToReprint
        ));
    }

    #[tokio::test]
    async fn test_print_failure_is_non_fatal_and_reprintable() {
        let h = harness();
        ring_up(&h.cart);
        h.printer.fail.store(true, Ordering::SeqCst);

        let outcome = h
            .service
            .checkout(PaymentMethod::Cash, None)
            .await
            .unwrap();

        // Sale saved, cart cleared, print marked failed.
        assert_eq!(outcome.print_status, PrintStatus::Failed);
        assert_eq!(h.ledger.recorded.lock().await.len(), 1);
        assert!(h.cart.with_cart(|c| c.is_empty()));

        // Printer comes back: reprint sends the very same receipt.
        h.printer.fail.store(false, Ordering::SeqCst);
        let status = h.service.reprint().await.unwrap();
        assert_eq!(status, PrintStatus::Printed);
        assert_eq!(
            h.printer.printed.lock().await.as_slice(),
            &[outcome.receipt.transaction_id.clone()]
        );
    }

    #[tokio::test]
    async fn test_reprint_without_checkout() {
        let h = harness();
        assert!(matches!(
            h.service.reprint().await.unwrap_err(),
            CheckoutError::NothingToReprint
        ));
    }

    #[tokio::test]
    async fn test_default_cashier_on_receipt_and_analytics() {
        let h = harness();
        ring_up(&h.cart);

        let outcome = h.service.checkout(PaymentMethod::Cash, None).await.unwrap();
        // No cashier selected: the receipt itself is stamped with the default.
        assert_eq!(
            outcome.receipt.employee_name.as_deref(),
            Some(DEFAULT_CASHIER)
        );

        let recorded = h.ledger.recorded.lock().await;
        assert_eq!(recorded[0].1[0].employee_name, DEFAULT_CASHIER);
    }

    #[tokio::test]
    async fn test_concurrent_checkouts_sell_once() {
        let h = harness();
        ring_up(&h.cart);

        let (first, second) = tokio::join!(
            h.service.checkout(PaymentMethod::Cash, None),
            h.service.checkout(PaymentMethod::Cash, None),
        );

        // Exactly one checkout wins the cart; the other finds it empty.
        let (won, lost) = match (first, second) {
            (Ok(outcome), Err(err)) | (Err(err), Ok(outcome)) => (outcome, err),
            other => panic!("expected one sale and one empty-cart error: {:?}", other),
        };
        assert!(matches!(lost, CheckoutError::EmptyCart));
        assert_eq!(won.receipt.total.rupiah(), 28_000);
        assert_eq!(h.ledger.recorded.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_line_added_during_checkout_survives() {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (gate_tx, gate_rx) = oneshot::channel();
        let ledger = Arc::new(GatedLedger {
            entered: Mutex::new(Some(entered_tx)),
            gate: Mutex::new(Some(gate_rx)),
        });
        let cart = CartState::new();
        let service = Arc::new(CheckoutService::new(
            ledger,
            Arc::new(MockPrinter::default()),
            cart.clone(),
        ));

        ring_up(&cart);
        let task = tokio::spawn({
            let service = service.clone();
            async move { service.checkout(PaymentMethod::Cash, None).await }
        });

        // Persistence is in flight; ring up the next customer's order.
        entered_rx.await.unwrap();
        let croissant = product("p3", "Croissant", 12_000);
        cart.with_cart_mut(|c| c.add_item(&croissant).unwrap());
        gate_tx.send(()).unwrap();

        let outcome = task.await.unwrap().unwrap();

        // The finished sale covers what was in the cart when it started.
        assert_eq!(outcome.receipt.total.rupiah(), 28_000);
        // The croissant is still in the cart, waiting for the next sale.
        cart.with_cart(|c| {
            assert_eq!(c.lines.len(), 1);
            assert_eq!(c.lines[0].product_id, "p3");
        });
    }
}
