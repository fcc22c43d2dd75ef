//! # Sale Repository
//!
//! Checkout persistence and reporting reads.
//!
//! ## Checkout Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     record_checkout()                                   │
//! │                                                                         │
//! │  BEGIN TRANSACTION                                                     │
//! │       │                                                                 │
//! │       ├── INSERT penjualan       (1 sale header)                       │
//! │       ├── INSERT penjualan_item  (N receipt lines)                     │
//! │       └── INSERT transactions    (N analytic rows)                     │
//! │       │                                                                 │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Any failure rolls back ALL rows. A sale either exists with its        │
//! │  complete set of analytic rows, or not at all.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use kopi_core::{AnalyticRecord, Discount, Money, PaymentMethod, ReceiptData, ReceiptItem};

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, FromRow)]
struct SaleRow {
    id: String,
    timestamp: DateTime<Utc>,
    subtotal: Money,
    discount_name: Option<String>,
    discount_amount: Money,
    total: Money,
    payment_method: PaymentMethod,
    employee_name: Option<String>,
}

#[derive(Debug, FromRow)]
struct ItemRow {
    name: String,
    qty: i64,
    price: Money,
    subtotal: Money,
}

#[derive(Debug, FromRow)]
struct AnalyticRow {
    id: String,
    item: String,
    product_id: String,
    quantity: i64,
    total: Money,
    kind: String,
    employee_name: String,
    created_at: DateTime<Utc>,
}

impl From<AnalyticRow> for AnalyticRecord {
    fn from(r: AnalyticRow) -> Self {
        AnalyticRecord {
            id: r.id,
            item: r.item,
            product_id: r.product_id,
            quantity: r.quantity,
            total: r.total,
            kind: r.kind,
            employee_name: r.employee_name,
            created_at: r.created_at,
        }
    }
}

/// Per-product sales aggregation for the popularity report.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductPopularity {
    pub product_id: String,
    pub item: String,
    pub total_quantity: i64,
    pub total_revenue: Money,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale persistence and reporting reads.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Persists a checkout: the sale header, its receipt lines, and the
    /// analytic rows, all in one transaction.
    ///
    /// ## Atomicity
    /// Every row lands or none does. Callers can treat any error as
    /// "nothing was written" and keep the cart for retry.
    pub async fn record_checkout(
        &self,
        receipt: &ReceiptData,
        analytics: &[AnalyticRecord],
    ) -> DbResult<()> {
        debug!(
            transaction_id = %receipt.transaction_id,
            lines = receipt.items.len(),
            total = %receipt.total,
            "Recording checkout"
        );

        let now = Utc::now();
        let (discount_name, discount_amount) = match &receipt.discount {
            Some(d) => (Some(d.name.clone()), d.amount),
            None => (None, Money::zero()),
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO penjualan (
                id, timestamp, subtotal,
                discount_name, discount_amount, total,
                payment_method, employee_name, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&receipt.transaction_id)
        .bind(receipt.timestamp)
        .bind(receipt.subtotal)
        .bind(&discount_name)
        .bind(discount_amount)
        .bind(receipt.total)
        .bind(receipt.payment_method)
        .bind(&receipt.employee_name)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for item in &receipt.items {
            sqlx::query(
                r#"
                INSERT INTO penjualan_item (id, penjualan_id, name, qty, price, subtotal)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&receipt.transaction_id)
            .bind(&item.name)
            .bind(item.qty)
            .bind(item.price)
            .bind(item.subtotal)
            .execute(&mut *tx)
            .await?;
        }

        for record in analytics {
            sqlx::query(
                r#"
                INSERT INTO transactions (
                    id, item, product_id, quantity, total,
                    kind, employee_name, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&record.id)
            .bind(&record.item)
            .bind(&record.product_id)
            .bind(record.quantity)
            .bind(record.total)
            .bind(&record.kind)
            .bind(&record.employee_name)
            .bind(record.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Fetches a persisted sale back as receipt data.
    pub async fn get_by_id(&self, transaction_id: &str) -> DbResult<Option<ReceiptData>> {
        let row: Option<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, timestamp, subtotal,
                   discount_name, discount_amount, total,
                   payment_method, employee_name
            FROM penjualan
            WHERE id = ?1
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let item_rows: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT name, qty, price, subtotal
            FROM penjualan_item
            WHERE penjualan_id = ?1
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        let discount = match (row.discount_name, row.discount_amount) {
            (Some(name), amount) if amount.is_positive() => Some(Discount { name, amount }),
            _ => None,
        };

        Ok(Some(ReceiptData {
            transaction_id: row.id,
            timestamp: row.timestamp,
            items: item_rows
                .into_iter()
                .map(|i| ReceiptItem {
                    name: i.name,
                    qty: i.qty,
                    price: i.price,
                    subtotal: i.subtotal,
                })
                .collect(),
            subtotal: row.subtotal,
            discount,
            total: row.total,
            payment_method: row.payment_method,
            employee_name: row.employee_name,
        }))
    }

    /// Most recent analytic records, newest first.
    pub async fn recent_transactions(&self, limit: i64) -> DbResult<Vec<AnalyticRecord>> {
        let rows: Vec<AnalyticRow> = sqlx::query_as(
            r#"
            SELECT id, item, product_id, quantity, total,
                   kind, employee_name, created_at
            FROM transactions
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AnalyticRecord::from).collect())
    }

    /// Per-product sales totals, highest quantity first.
    pub async fn product_popularity(&self, limit: i64) -> DbResult<Vec<ProductPopularity>> {
        let rows: Vec<ProductPopularity> = sqlx::query_as(
            r#"
            SELECT product_id,
                   MAX(item) AS item,
                   SUM(quantity) AS total_quantity,
                   SUM(total) AS total_revenue
            FROM transactions
            WHERE kind = 'sale'
            GROUP BY product_id
            ORDER BY total_quantity DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn receipt(transaction_id: &str) -> ReceiptData {
        ReceiptData::new(
            transaction_id.to_string(),
            Utc::now(),
            vec![
                ReceiptItem {
                    name: "Es Kopi Susu".to_string(),
                    qty: 2,
                    price: Money::from_rupiah(10_000),
                    subtotal: Money::from_rupiah(20_000),
                },
                ReceiptItem {
                    name: "Roti Bakar".to_string(),
                    qty: 1,
                    price: Money::from_rupiah(8_000),
                    subtotal: Money::from_rupiah(8_000),
                },
            ],
            Money::from_rupiah(28_000),
            None,
            PaymentMethod::Cash,
            Some("Sari".to_string()),
        )
    }

    fn analytic(id: &str, product_id: &str, name: &str, qty: i64, total: i64) -> AnalyticRecord {
        AnalyticRecord {
            id: id.to_string(),
            item: name.to_string(),
            product_id: product_id.to_string(),
            quantity: qty,
            total: Money::from_rupiah(total),
            kind: "sale".to_string(),
            employee_name: "Sari".to_string(),
            created_at: Utc::now(),
        }
    }

    async fn table_count(db: &Database, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_record_checkout_round_trip() {
        let db = test_db().await;
        let repo = db.sales();

        let original = receipt("TRX-roundtrip");
        let analytics = vec![
            analytic("a1", "p1", "Es Kopi Susu", 2, 20_000),
            analytic("a2", "p2", "Roti Bakar", 1, 8_000),
        ];
        repo.record_checkout(&original, &analytics).await.unwrap();

        let fetched = repo.get_by_id("TRX-roundtrip").await.unwrap().unwrap();

        assert_eq!(fetched.items.len(), 2);
        assert_eq!(fetched.subtotal.rupiah(), 28_000);
        assert_eq!(fetched.total.rupiah(), 28_000);
        assert_eq!(fetched.payment_method, PaymentMethod::Cash);
        assert_eq!(fetched.employee_name.as_deref(), Some("Sari"));
        assert!(fetched.discount.is_none());

        let recent = repo.recent_transactions(10).await.unwrap();
        assert_eq!(recent.len(), 2);
    }

    #[tokio::test]
    async fn test_checkout_rolls_back_completely_on_failure() {
        let db = test_db().await;
        let repo = db.sales();

        // Duplicate analytic IDs force a unique violation after the sale
        // header and items are already inside the transaction.
        let analytics = vec![
            analytic("dup", "p1", "Es Kopi Susu", 2, 20_000),
            analytic("dup", "p2", "Roti Bakar", 1, 8_000),
        ];
        let err = repo
            .record_checkout(&receipt("TRX-doomed"), &analytics)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // Nothing from the failed checkout may remain in any table.
        assert_eq!(table_count(&db, "penjualan").await, 0);
        assert_eq!(table_count(&db, "penjualan_item").await, 0);
        assert_eq!(table_count(&db, "transactions").await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_transaction_id_rejected() {
        let db = test_db().await;
        let repo = db.sales();

        repo.record_checkout(&receipt("TRX-once"), &[]).await.unwrap();
        let err = repo
            .record_checkout(&receipt("TRX-once"), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(table_count(&db, "penjualan").await, 1);
    }

    #[tokio::test]
    async fn test_product_popularity_aggregates() {
        let db = test_db().await;
        let repo = db.sales();

        repo.record_checkout(
            &receipt("TRX-1"),
            &[
                analytic("a1", "p1", "Es Kopi Susu", 2, 20_000),
                analytic("a2", "p2", "Roti Bakar", 1, 8_000),
            ],
        )
        .await
        .unwrap();
        repo.record_checkout(
            &receipt("TRX-2"),
            &[analytic("a3", "p1", "Es Kopi Susu", 3, 30_000)],
        )
        .await
        .unwrap();

        let popularity = repo.product_popularity(10).await.unwrap();

        assert_eq!(popularity.len(), 2);
        assert_eq!(popularity[0].product_id, "p1");
        assert_eq!(popularity[0].total_quantity, 5);
        assert_eq!(popularity[0].total_revenue.rupiah(), 50_000);
        assert_eq!(popularity[1].total_quantity, 1);
    }

    #[tokio::test]
    async fn test_discount_round_trip() {
        let db = test_db().await;
        let repo = db.sales();

        let mut with_discount = receipt("TRX-disc");
        let discounted = ReceiptData::new(
            with_discount.transaction_id.clone(),
            with_discount.timestamp,
            std::mem::take(&mut with_discount.items),
            with_discount.subtotal,
            Some(Discount {
                name: "Member".to_string(),
                amount: Money::from_rupiah(3_000),
            }),
            PaymentMethod::Qris,
            None,
        );
        repo.record_checkout(&discounted, &[]).await.unwrap();

        let fetched = repo.get_by_id("TRX-disc").await.unwrap().unwrap();

        let discount = fetched.discount.unwrap();
        assert_eq!(discount.name, "Member");
        assert_eq!(discount.amount.rupiah(), 3_000);
        assert_eq!(fetched.total.rupiah(), 25_000);
    }
}
