//! # Bluetooth Printer Transport
//!
//! BLE GATT session management for thermal receipt printers.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     BluetoothPrinter::print()                           │
//! │                                                                         │
//! │  lock session mutex  ◄── concurrent prints serialize here              │
//! │       │                                                                 │
//! │       ├── live session? ────────────► reuse it                         │
//! │       │                                                                 │
//! │       └── otherwise:                                                   │
//! │            1. first adapter        (else AdapterUnavailable)           │
//! │            2. bounded unfiltered scan (else DeviceNotFound)            │
//! │               · service 000018f0-... advertised, or                    │
//! │               · name starts with InnerPrinter / MPT / BT printer       │
//! │            3. connect + discover                                       │
//! │            4. find 00002af1-...    (else CharacteristicNotFound)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  encode receipt ──► write ceil(len/20) chunks, each acknowledged       │
//! │       │                                                                 │
//! │       └── write error? drop session, next print reconnects             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{
    Central, CentralEvent, Characteristic, Manager as _, Peripheral as _, ScanFilter, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::StreamExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use kopi_core::ReceiptData;

use crate::encoder::ReceiptEncoder;
use crate::error::{PrintError, PrintResult};
use crate::transport::{PrintOutcome, PrinterTransport, CHUNK_SIZE};

// =============================================================================
// Constants
// =============================================================================

/// GATT service advertised by BLE thermal printers.
pub const PRINTER_SERVICE_UUID: Uuid = Uuid::from_u128(0x000018f0_0000_1000_8000_00805f9b34fb);

/// Writable characteristic the receipt bytes go to.
pub const WRITE_CHARACTERISTIC_UUID: Uuid = Uuid::from_u128(0x00002af1_0000_1000_8000_00805f9b34fb);

/// Advertised-name prefixes of known printer models, accepted even when
/// the device doesn't advertise the printer service.
pub const NAME_PREFIXES: [&str; 3] = ["InnerPrinter", "MPT", "BT printer"];

/// How long a scan waits before giving up.
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(10);

/// Whether an advertised device name identifies a supported printer.
fn is_recognized_name(name: &str) -> bool {
    NAME_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

// =============================================================================
// Transport
// =============================================================================

/// A connected printer: the peripheral and its write characteristic.
#[derive(Debug)]
struct Session {
    peripheral: Peripheral,
    characteristic: Characteristic,
}

/// BLE transport for ESC/POS thermal printers.
///
/// The session lives behind a `tokio::sync::Mutex`: one print at a time,
/// so two checkouts can never interleave their chunks on the wire.
#[derive(Debug)]
pub struct BluetoothPrinter {
    encoder: ReceiptEncoder,
    scan_timeout: Duration,
    session: Mutex<Option<Session>>,
}

impl BluetoothPrinter {
    /// Creates a transport with the default scan window.
    pub fn new(encoder: ReceiptEncoder) -> Self {
        Self::with_scan_timeout(encoder, DEFAULT_SCAN_TIMEOUT)
    }

    /// Creates a transport with a custom scan window.
    pub fn with_scan_timeout(encoder: ReceiptEncoder, scan_timeout: Duration) -> Self {
        BluetoothPrinter {
            encoder,
            scan_timeout,
            session: Mutex::new(None),
        }
    }

    /// Returns the first Bluetooth adapter on this machine.
    async fn adapter() -> PrintResult<Adapter> {
        let manager = Manager::new().await?;
        manager
            .adapters()
            .await?
            .into_iter()
            .next()
            .ok_or(PrintError::AdapterUnavailable)
    }

    /// Scans until a recognized printer shows up or the window closes.
    async fn discover(&self, adapter: &Adapter) -> PrintResult<Peripheral> {
        let mut events = adapter.events().await?;
        // Unfiltered scan: some printer models advertise only their name,
        // not the service UUID, and a service filter would hide them.
        adapter.start_scan(ScanFilter::default()).await?;
        debug!(timeout = ?self.scan_timeout, "Scanning for printer");

        let deadline = tokio::time::Instant::now() + self.scan_timeout;
        let found = loop {
            let event = match tokio::time::timeout_at(deadline, events.next()).await {
                Ok(Some(event)) => event,
                // Event stream ended or the scan window closed.
                Ok(None) | Err(_) => break None,
            };

            let id = match event {
                CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id) => id,
                _ => continue,
            };

            let peripheral = adapter.peripheral(&id).await?;
            if Self::matches_printer(&peripheral).await {
                break Some(peripheral);
            }
        };

        if let Err(err) = adapter.stop_scan().await {
            warn!(error = %err, "Failed to stop scan");
        }

        found.ok_or(PrintError::DeviceNotFound {
            waited: self.scan_timeout,
        })
    }

    /// Accepts devices advertising the printer service or a known name.
    async fn matches_printer(peripheral: &Peripheral) -> bool {
        let props = match peripheral.properties().await {
            Ok(Some(props)) => props,
            _ => return false,
        };
        if props.services.contains(&PRINTER_SERVICE_UUID) {
            return true;
        }
        props.local_name.as_deref().is_some_and(is_recognized_name)
    }

    /// Full connection sequence: adapter, scan, connect, characteristic.
    async fn establish(&self) -> PrintResult<Session> {
        let adapter = Self::adapter().await?;
        let peripheral = self.discover(&adapter).await?;

        peripheral.connect().await?;
        peripheral.discover_services().await?;

        let characteristic = peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == WRITE_CHARACTERISTIC_UUID)
            .ok_or(PrintError::CharacteristicNotFound)?;

        info!("Printer connected");
        Ok(Session {
            peripheral,
            characteristic,
        })
    }
}

#[async_trait]
impl PrinterTransport for BluetoothPrinter {
    async fn print(&self, receipt: &ReceiptData) -> PrintResult<PrintOutcome> {
        let mut guard = self.session.lock().await;

        // Reuse the session only while the link is still up.
        let session = match guard.take() {
            Some(session) if session.peripheral.is_connected().await.unwrap_or(false) => session,
            _ => self.establish().await?,
        };

        let payload = self.encoder.encode(receipt);
        debug!(
            transaction_id = %receipt.transaction_id,
            bytes = payload.len(),
            chunks = (payload.len() + CHUNK_SIZE - 1) / CHUNK_SIZE,
            "Sending receipt"
        );

        for chunk in payload.chunks(CHUNK_SIZE) {
            if let Err(err) = session
                .peripheral
                .write(&session.characteristic, chunk, WriteType::WithResponse)
                .await
            {
                // Leave the guard empty: the next print reconnects.
                warn!(error = %err, "Chunk write failed, dropping session");
                return Err(PrintError::WriteFailed(err.to_string()));
            }
        }

        info!(transaction_id = %receipt.transaction_id, "Receipt printed");
        *guard = Some(session);
        Ok(PrintOutcome::Printed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
