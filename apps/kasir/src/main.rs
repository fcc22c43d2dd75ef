//! # Kasir
//!
//! The cashier HTTP API for Kopi POS.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Kasir Server                                   │
//! │                                                                         │
//! │  POS screen ───► JSON API (8972) ───► CheckoutService ───► SQLite      │
//! │                                            │                            │
//! │                                            ▼                            │
//! │                                      BLE printer                        │
//! │                                   (or null printer)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod checkout;
mod config;
mod error;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kopi_db::{Database, DbConfig};
use kopi_print::{BluetoothPrinter, NullPrinter, PrinterTransport, ReceiptEncoder};

use crate::checkout::CheckoutService;
use crate::config::KasirConfig;
use crate::state::{AppState, CartState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Kasir server...");

    // Load configuration
    let config = KasirConfig::from_env();
    info!(
        listen_addr = %config.listen_addr,
        database_path = %config.database_path.display(),
        printer_enabled = config.printer_enabled,
        "Configuration loaded"
    );

    // Open database
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Connected to SQLite");

    // Run migrations
    db.run_migrations().await?;
    info!("Database migrations complete");

    // Pick the printer transport
    let encoder = ReceiptEncoder::new(config.shop.clone());
    let printer: Arc<dyn PrinterTransport> = if config.printer_enabled {
        info!(scan_timeout = ?config.scan_timeout, "Using Bluetooth printer");
        Arc::new(BluetoothPrinter::with_scan_timeout(
            encoder,
            config.scan_timeout,
        ))
    } else {
        warn!("No printer configured, receipts will be skipped");
        Arc::new(NullPrinter)
    };

    // Create shared state
    let cart = CartState::new();
    let checkout = Arc::new(CheckoutService::new(
        Arc::new(db.clone()),
        printer,
        cart.clone(),
    ));
    let state = AppState { db, cart, checkout };

    // Start server
    let addr: SocketAddr = config.listen_addr.parse()?;
    info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
