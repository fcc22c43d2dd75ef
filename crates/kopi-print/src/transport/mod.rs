//! # Printer Transports
//!
//! The [`PrinterTransport`] trait and its implementations.
//!
//! ## Capability Injection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Transport Selection                                │
//! │                                                                         │
//! │  kasir startup                                                         │
//! │       │                                                                 │
//! │       ├── printer enabled?  ──► BluetoothPrinter (real BLE session)    │
//! │       │                                                                 │
//! │       └── printer disabled? ──► NullPrinter (reports Skipped)          │
//! │                                                                         │
//! │  Checkout holds an Arc<dyn PrinterTransport> and never asks which      │
//! │  implementation it got. No runtime capability sniffing.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Chunked Delivery
//! BLE characteristic writes carry at most [`CHUNK_SIZE`] bytes, so the
//! encoded receipt is split into sequential chunks covering the payload in
//! order, each awaited before the next. Cheap printer firmware drops data
//! on larger or overlapping writes.

use async_trait::async_trait;
use tracing::info;

use kopi_core::ReceiptData;

use crate::error::PrintResult;

pub mod bluetooth;

/// Maximum bytes per BLE characteristic write.
///
/// 20 is the ATT default payload (23-byte MTU minus 3 bytes of header),
/// the safe floor every BLE printer accepts.
pub const CHUNK_SIZE: usize = 20;

/// What a transport did with a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintOutcome {
    /// The full payload reached the printer.
    Printed,
    /// The transport is a no-op and the receipt was intentionally not sent.
    Skipped,
}

/// A destination for encoded receipts.
///
/// Errors are always non-fatal to the sale: the checkout records them and
/// offers a reprint.
#[async_trait]
pub trait PrinterTransport: Send + Sync {
    /// Delivers a receipt, connecting first if needed.
    async fn print(&self, receipt: &ReceiptData) -> PrintResult<PrintOutcome>;
}

/// Transport used when no printer is configured.
///
/// Always succeeds with [`PrintOutcome::Skipped`], keeping checkout
/// behavior identical with or without hardware attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPrinter;

#[async_trait]
impl PrinterTransport for NullPrinter {
    async fn print(&self, receipt: &ReceiptData) -> PrintResult<PrintOutcome> {
        info!(
            transaction_id = %receipt.transaction_id,
            "No printer configured, skipping receipt"
        );
        Ok(PrintOutcome::Skipped)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kopi_core::{Money, PaymentMethod};

    fn empty_receipt() -> ReceiptData {
        ReceiptData::new(
            "TRX-null".to_string(),
            Utc::now(),
            vec![],
            Money::zero(),
            None,
            PaymentMethod::Cash,
            None,
        )
    }

    #[tokio::test]
    async fn test_null_printer_skips() {
        let printer = NullPrinter;
        let outcome = printer.print(&empty_receipt()).await.unwrap();
        assert_eq!(outcome, PrintOutcome::Skipped);
    }

    #[test]
    fn test_chunking_covers_payload_in_order() {
        for len in [1usize, 19, 20, 21, 40, 45, 1000] {
            let payload: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            let chunks: Vec<&[u8]> = payload.chunks(CHUNK_SIZE).collect();

            // ceil(len / CHUNK_SIZE) chunks
            assert_eq!(chunks.len(), (len + CHUNK_SIZE - 1) / CHUNK_SIZE);

            // every chunk except the last is exactly CHUNK_SIZE
            for chunk in &chunks[..chunks.len() - 1] {
                assert_eq!(chunk.len(), CHUNK_SIZE);
            }
            assert!(chunks[chunks.len() - 1].len() <= CHUNK_SIZE);
            assert!(!chunks[chunks.len() - 1].is_empty());

            // concatenated chunks reproduce the payload: no gap, no overlap
            let rejoined: Vec<u8> = chunks.concat();
            assert_eq!(rejoined, payload);
        }
    }

    #[test]
    fn test_empty_payload_has_no_chunks() {
        let payload: Vec<u8> = vec![];
        assert_eq!(payload.chunks(CHUNK_SIZE).count(), 0);
    }
}
