//! # kopi-print: Receipt Printing for Kopi POS
//!
//! Everything between a finished sale and paper.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Print Pipeline                                   │
//! │                                                                         │
//! │  Checkout (apps/kasir)                                                 │
//! │       │  ReceiptData                                                    │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    kopi-print (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐  │   │
//! │  │   │   encoder    │──►│   protocol   │   │    transport     │  │   │
//! │  │   │ receipt      │   │ ESC/POS cmds │   │ BluetoothPrinter │  │   │
//! │  │   │ layout       │   │ CP850 text   │   │ NullPrinter      │  │   │
//! │  │   └──────────────┘   └──────────────┘   └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │        encode(&ReceiptData) -> Vec<u8>  ──►  20-byte chunks    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BLE GATT characteristic 00002af1-... on the thermal printer           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`protocol`] - ESC/POS command builders and CP850 encoding
//! - [`encoder`] - Receipt layout: `ReceiptData` to printer bytes
//! - [`transport`] - The `PrinterTransport` trait and its implementations
//! - [`error`] - Print error types
//!
//! ## Design Principles
//!
//! 1. **Encoding is pure**: `encode()` is deterministic with no I/O; the
//!    same receipt always produces the same bytes
//! 2. **Printing never kills a sale**: transports return errors, callers
//!    decide; the checkout treats them as non-fatal
//! 3. **One session at a time**: the BLE session is mutex-guarded so
//!    concurrent prints serialize instead of interleaving chunks

pub mod encoder;
pub mod error;
pub mod protocol;
pub mod transport;

pub use encoder::{ReceiptEncoder, ShopProfile};
pub use error::{PrintError, PrintResult};
pub use transport::{NullPrinter, PrintOutcome, PrinterTransport, CHUNK_SIZE};
pub use transport::bluetooth::BluetoothPrinter;
