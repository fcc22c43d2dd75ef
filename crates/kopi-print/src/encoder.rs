//! # Receipt Encoder
//!
//! Pure `ReceiptData` to ESC/POS byte transformation.
//!
//! ## Receipt Layout (32-column thermal paper)
//! ```text
//! ┌────────────────────────────────────┐
//! │          KOPI DARI HATI            │  center, bold
//! │        Cicalengka, Bandung         │  center
//! │     Every moment feels lighter     │  center
//! │ ---------------------------------- │
//! │ ID: TRX-9f3a...                    │  left
//! │ Waktu: 27/08/2026 14.05.09         │
//! │ ---------------------------------- │
//! │ Es Kopi Susu                       │
//! │ 2 x 10.000   20.000                │
//! │ ---------------------------------- │
//! │                 Subtotal: Rp 20.000│  right
//! │                  TOTAL: Rp 20.000  │  right, bold
//! │ Metode: Tunai                      │  left
//! │ Kasir: Sari                        │
//! │ ---------------------------------- │
//! │           Terima kasih             │  center
//! │         Selamat menikmati!         │
//! │                                    │  3 blank lines, cut
//! └────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//! `encode` is a pure function of its input. Encoding the same receipt
//! twice yields byte-identical output, which is what makes reprint an
//! exact replica of the original.

use serde::{Deserialize, Serialize};

use kopi_core::ReceiptData;

use crate::protocol::commands::{self, Alignment};

/// Divider matching the 32-column paper width.
const DIVIDER: &str = "--------------------------------";

/// Timestamp format on the receipt: `27/08/2026 14.05.09`.
///
/// Fixed rather than locale-dependent so the same receipt always encodes
/// to the same bytes.
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H.%M.%S";

// =============================================================================
// Shop Profile
// =============================================================================

/// The static header and footer text printed on every receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopProfile {
    /// Shop name, printed centered and bold.
    pub name: String,

    /// Address line.
    pub address: String,

    /// Tagline under the address.
    pub tagline: String,

    /// Centered footer lines after the divider.
    pub footer: Vec<String>,
}

impl Default for ShopProfile {
    fn default() -> Self {
        ShopProfile {
            name: "EXAMPLE COFFE".to_string(),
            address: "Cicalengka, Bandung".to_string(),
            tagline: "Every moment feels lighter".to_string(),
            footer: vec![
                "Terima kasih".to_string(),
                "Selamat menikmati!".to_string(),
            ],
        }
    }
}

// =============================================================================
// Encoder
// =============================================================================

/// Stateless receipt encoder.
#[derive(Debug, Clone, Default)]
pub struct ReceiptEncoder {
    profile: ShopProfile,
}

impl ReceiptEncoder {
    /// Creates an encoder with the given shop profile.
    pub fn new(profile: ShopProfile) -> Self {
        ReceiptEncoder { profile }
    }

    /// Encodes a receipt into the full ESC/POS byte stream, cut included.
    pub fn encode(&self, receipt: &ReceiptData) -> Vec<u8> {
        let mut out = Vec::with_capacity(512);

        // Header
        out.extend(commands::init());
        out.extend(commands::codepage_cp850());
        out.extend(commands::align(Alignment::Center));
        out.extend(commands::bold(true));
        out.extend(commands::text_line(&self.profile.name));
        out.extend(commands::bold(false));
        out.extend(commands::text_line(&self.profile.address));
        out.extend(commands::text_line(&self.profile.tagline));
        out.extend(commands::text_line(DIVIDER));

        // Sale identity
        out.extend(commands::align(Alignment::Left));
        out.extend(commands::text_line(&format!(
            "ID: {}",
            receipt.transaction_id
        )));
        out.extend(commands::text_line(&format!(
            "Waktu: {}",
            receipt.timestamp.format(TIMESTAMP_FORMAT)
        )));
        out.extend(commands::text_line(DIVIDER));

        // Line items: name on its own line, then qty x unit and subtotal
        for item in &receipt.items {
            out.extend(commands::text_line(&item.name));
            out.extend(commands::text_line(&format!(
                "{} x {}   {}",
                item.qty,
                item.price.grouped(),
                item.subtotal.grouped()
            )));
        }
        out.extend(commands::text_line(DIVIDER));

        // Totals block
        out.extend(commands::align(Alignment::Right));
        out.extend(commands::text_line(&format!(
            "Subtotal: Rp {}",
            receipt.subtotal.grouped()
        )));
        if let Some(discount) = receipt.discount.as_ref().filter(|d| d.amount.is_positive()) {
            out.extend(commands::text_line(&format!(
                "Disc ({}): -{}",
                discount.name,
                discount.amount.grouped()
            )));
        }
        out.extend(commands::bold(true));
        out.extend(commands::text_line(&format!(
            "TOTAL: Rp {}",
            receipt.total.grouped()
        )));
        out.extend(commands::bold(false));

        // Payment details
        out.extend(commands::align(Alignment::Left));
        out.extend(commands::text_line(&format!(
            "Metode: {}",
            receipt.payment_method.label()
        )));
        out.extend(commands::text_line(&format!(
            "Kasir: {}",
            receipt.cashier_label()
        )));
        out.extend(commands::text_line(DIVIDER));

        // Footer
        out.extend(commands::align(Alignment::Center));
        for line in &self.profile.footer {
            out.extend(commands::text_line(line));
        }
        out.extend(commands::feed_lines(3));
        out.extend(commands::cut());

        out
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use kopi_core::{Discount, Money, PaymentMethod, ReceiptItem};

    fn sample_receipt() -> ReceiptData {
        ReceiptData::new(
            "TRX-test-0001".to_string(),
            Utc.with_ymd_and_hms(2026, 8, 27, 14, 5, 9).unwrap(),
            vec![ReceiptItem {
                name: "Es Kopi Susu".to_string(),
                qty: 2,
                price: Money::from_rupiah(10_000),
                subtotal: Money::from_rupiah(20_000),
            }],
            Money::from_rupiah(20_000),
            None,
            PaymentMethod::Cash,
            Some("Sari".to_string()),
        )
    }

    #[test]
    fn test_encode_is_deterministic() {
        let encoder = ReceiptEncoder::default();
        let receipt = sample_receipt();

        assert_eq!(encoder.encode(&receipt), encoder.encode(&receipt));
    }

    #[test]
    fn test_starts_with_init_and_codepage() {
        let encoder = ReceiptEncoder::default();
        let bytes = encoder.encode(&sample_receipt());

        assert_eq!(&bytes[..5], &[0x1B, 0x40, 0x1B, 0x74, 0x02]);
    }

    #[test]
    fn test_ends_with_feed_and_cut() {
        let encoder = ReceiptEncoder::default();
        let bytes = encoder.encode(&sample_receipt());

        let tail = &bytes[bytes.len() - 6..];
        assert_eq!(tail, &[0x0A, 0x0A, 0x0A, 0x1D, 0x56, 0x00]);
    }

    #[test]
    fn test_receipt_text_content() {
        let encoder = ReceiptEncoder::default();
        let bytes = encoder.encode(&sample_receipt());
        let text = String::from_utf8_lossy(&bytes).into_owned();

        assert!(text.contains("EXAMPLE COFFE\n"));
        assert!(text.contains("ID: TRX-test-0001\n"));
        assert!(text.contains("Waktu: 27/08/2026 14.05.09\n"));
        assert!(text.contains("Es Kopi Susu\n"));
        assert!(text.contains("2 x 10.000   20.000\n"));
        assert!(text.contains("Subtotal: Rp 20.000\n"));
        assert!(text.contains("TOTAL: Rp 20.000\n"));
        assert!(text.contains("Metode: Tunai\n"));
        assert!(text.contains("Kasir: Sari\n"));
        assert!(text.contains("Terima kasih\n"));
    }

    #[test]
    fn test_total_line_parses_back() {
        let encoder = ReceiptEncoder::default();
        let receipt = sample_receipt();
        let bytes = encoder.encode(&receipt);
        let text = String::from_utf8_lossy(&bytes).into_owned();

        let total_line = text
            .lines()
            .find(|l| l.contains("TOTAL: Rp "))
            .expect("total line present");
        let rendered = total_line.split("TOTAL: Rp ").nth(1).unwrap();

        assert_eq!(Money::parse_grouped(rendered), Some(receipt.total));
    }

    #[test]
    fn test_discount_line_only_when_positive() {
        let encoder = ReceiptEncoder::default();

        let without = encoder.encode(&sample_receipt());
        assert!(!String::from_utf8_lossy(&without).contains("Disc ("));

        let base = sample_receipt();
        let discounted = ReceiptData::new(
            base.transaction_id.clone(),
            base.timestamp,
            base.items.clone(),
            base.subtotal,
            Some(Discount {
                name: "Member".to_string(),
                amount: Money::from_rupiah(2_000),
            }),
            base.payment_method,
            base.employee_name.clone(),
        );
        let bytes = encoder.encode(&discounted);
        let text = String::from_utf8_lossy(&bytes).into_owned();

        assert!(text.contains("Disc (Member): -2.000\n"));
        assert!(text.contains("TOTAL: Rp 18.000\n"));
    }

    #[test]
    fn test_missing_cashier_prints_dash() {
        let encoder = ReceiptEncoder::default();
        let base = sample_receipt();
        let anonymous = ReceiptData::new(
            base.transaction_id.clone(),
            base.timestamp,
            base.items.clone(),
            base.subtotal,
            None,
            base.payment_method,
            None,
        );

        let text = String::from_utf8_lossy(&encoder.encode(&anonymous)).into_owned();
        assert!(text.contains("Kasir: -\n"));
    }

    #[test]
    fn test_two_iced_coffees_paid_cash() {
        // Es Kopi Susu x2 at Rp 10.000, Tunai
        let encoder = ReceiptEncoder::default();
        let receipt = sample_receipt();

        assert_eq!(receipt.total.rupiah(), 20_000);
        assert_eq!(receipt.items[0].subtotal.rupiah(), 20_000);

        let text = String::from_utf8_lossy(&encoder.encode(&receipt)).into_owned();
        assert!(text.contains("TOTAL: Rp 20.000\n"));
        assert!(text.contains("Metode: Tunai\n"));
    }
}
