//! # Print Error Types
//!
//! Errors for printer connection and receipt delivery.
//!
//! Every variant here is non-fatal to the sale: the checkout records the
//! failure, keeps the persisted sale, and offers a reprint.

use std::time::Duration;

use thiserror::Error;

/// Printer connection and write errors.
#[derive(Debug, Error)]
pub enum PrintError {
    /// No Bluetooth adapter is available on this machine.
    #[error("No Bluetooth adapter available")]
    AdapterUnavailable,

    /// No recognized printer was found within the scan window.
    ///
    /// ## When This Occurs
    /// - Printer is powered off or out of range
    /// - Printer advertises neither the thermal-printer service UUID nor
    ///   a recognized name prefix
    #[error("No printer found after scanning for {waited:?}")]
    DeviceNotFound { waited: Duration },

    /// Connected to a device that doesn't expose the writable
    /// print characteristic.
    #[error("Printer is missing the write characteristic")]
    CharacteristicNotFound,

    /// A chunk write failed mid-receipt.
    ///
    /// The session is dropped; the next print reconnects from scratch.
    #[error("Write to printer failed: {0}")]
    WriteFailed(String),

    /// Any other Bluetooth stack error (scan, connect, discovery).
    #[error("Bluetooth error: {0}")]
    Bluetooth(String),
}

impl From<btleplug::Error> for PrintError {
    fn from(err: btleplug::Error) -> Self {
        PrintError::Bluetooth(err.to_string())
    }
}

/// Result type for print operations.
pub type PrintResult<T> = Result<T, PrintError>;
