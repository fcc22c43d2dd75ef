//! # Employee Repository
//!
//! Staff reads for the cashier picker. Employees live in `pegawai`.

use sqlx::prelude::FromRow;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kopi_core::Employee;

#[derive(Debug, FromRow)]
struct EmployeeRow {
    id: String,
    name: String,
    is_active: bool,
}

/// Repository for employee operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Lists active employees, ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Employee>> {
        let rows: Vec<EmployeeRow> = sqlx::query_as(
            r#"
            SELECT id, name, is_active
            FROM pegawai
            WHERE is_active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Employee {
                id: r.id,
                name: r.name,
                is_active: r.is_active,
            })
            .collect())
    }

    /// Inserts an employee.
    pub async fn insert(&self, employee: &Employee) -> DbResult<()> {
        debug!(id = %employee.id, name = %employee.name, "Inserting employee");

        sqlx::query(
            r#"
            INSERT INTO pegawai (id, name, is_active)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&employee.id)
        .bind(&employee.name)
        .bind(employee.is_active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
