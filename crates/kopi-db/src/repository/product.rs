//! # Product Repository
//!
//! Catalog reads and writes. Products live in `produk` with their size
//! variants in `produk_varian`; the sales screen reads them joined into
//! [`Product`] values.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::prelude::FromRow;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use kopi_core::{Money, Product, ProductVariant};

// =============================================================================
// Row Types
// =============================================================================
// Runtime-checked queries decode into these row structs, which are then
// assembled into domain types.

#[derive(Debug, FromRow)]
struct ProductRow {
    id: String,
    name: String,
    price: Option<Money>,
    category: String,
    is_active: bool,
}

#[derive(Debug, FromRow)]
struct VariantRow {
    produk_id: String,
    size: String,
    price: Money,
}

impl ProductRow {
    fn into_product(self, variants: Vec<ProductVariant>) -> Product {
        Product {
            id: self.id,
            name: self.name,
            price: self.price,
            variants,
            category: self.category,
            is_active: self.is_active,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product catalog operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all active products with their variants, ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, price, category, is_active
            FROM produk
            WHERE is_active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let variant_rows: Vec<VariantRow> = sqlx::query_as(
            r#"
            SELECT v.produk_id, v.size, v.price
            FROM produk_varian v
            JOIN produk p ON p.id = v.produk_id
            WHERE p.is_active = 1
            ORDER BY v.price
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_product: HashMap<String, Vec<ProductVariant>> = HashMap::new();
        for row in variant_rows {
            by_product.entry(row.produk_id).or_default().push(ProductVariant {
                size: row.size,
                price: row.price,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let variants = by_product.remove(&row.id).unwrap_or_default();
                row.into_product(variants)
            })
            .collect())
    }

    /// Gets a product by ID, including inactive ones.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, price, category, is_active
            FROM produk
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let variant_rows: Vec<VariantRow> = sqlx::query_as(
            r#"
            SELECT produk_id, size, price
            FROM produk_varian
            WHERE produk_id = ?1
            ORDER BY price
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let variants = variant_rows
            .into_iter()
            .map(|v| ProductVariant {
                size: v.size,
                price: v.price,
            })
            .collect();

        Ok(Some(row.into_product(variants)))
    }

    /// Inserts a product and its variants in one transaction.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO produk (id, name, price, category, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.category)
        .bind(product.is_active)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for variant in &product.variants {
            sqlx::query(
                r#"
                INSERT INTO produk_varian (id, produk_id, size, price)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&product.id)
            .bind(&variant.size)
            .bind(variant.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
