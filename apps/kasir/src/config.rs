//! # Configuration
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`KOPI_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use kopi_print::ShopProfile;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KasirConfig {
    /// Address the HTTP API binds to.
    /// Default: "127.0.0.1:8972"
    pub listen_addr: String,

    /// Path to the SQLite database file.
    /// Default: "./data/kopi.db"
    pub database_path: PathBuf,

    /// Whether to drive a real BLE printer. When false, the null printer
    /// is injected and checkouts report the print as skipped.
    /// Default: false (dev machines rarely have the printer nearby)
    pub printer_enabled: bool,

    /// How long a printer scan waits before giving up.
    /// Default: 10 seconds
    pub scan_timeout: Duration,

    /// Receipt header and footer text.
    pub shop: ShopProfile,
}

impl Default for KasirConfig {
    fn default() -> Self {
        KasirConfig {
            listen_addr: "127.0.0.1:8972".to_string(),
            database_path: PathBuf::from("./data/kopi.db"),
            printer_enabled: false,
            scan_timeout: Duration::from_secs(10),
            shop: ShopProfile::default(),
        }
    }
}

impl KasirConfig {
    /// Creates a configuration from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `KOPI_LISTEN_ADDR`: bind address
    /// - `KOPI_DATABASE_PATH`: SQLite file path
    /// - `KOPI_PRINTER`: "ble" to drive the Bluetooth printer
    /// - `KOPI_SCAN_TIMEOUT_SECS`: printer scan window in seconds
    /// - `KOPI_SHOP_NAME` / `KOPI_SHOP_ADDRESS` / `KOPI_SHOP_TAGLINE`:
    ///   receipt header overrides
    pub fn from_env() -> Self {
        let mut config = KasirConfig::default();

        if let Ok(addr) = std::env::var("KOPI_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Ok(path) = std::env::var("KOPI_DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }

        if let Ok(printer) = std::env::var("KOPI_PRINTER") {
            config.printer_enabled = printer.eq_ignore_ascii_case("ble");
        }

        if let Ok(secs) = std::env::var("KOPI_SCAN_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                config.scan_timeout = Duration::from_secs(secs);
            }
        }

        if let Ok(name) = std::env::var("KOPI_SHOP_NAME") {
            config.shop.name = name;
        }
        if let Ok(address) = std::env::var("KOPI_SHOP_ADDRESS") {
            config.shop.address = address;
        }
        if let Ok(tagline) = std::env::var("KOPI_SHOP_TAGLINE") {
            config.shop.tagline = tagline;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KasirConfig::default();

        assert_eq!(config.listen_addr, "127.0.0.1:8972");
        assert!(!config.printer_enabled);
        assert_eq!(config.scan_timeout, Duration::from_secs(10));
        assert_eq!(config.shop.name, "EXAMPLE COFFE");
    }
}
