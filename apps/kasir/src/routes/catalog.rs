//! # Catalog Routes
//!
//! Read-only lookups that feed the sales screen: the product grid and the
//! cashier picker. Both return only active rows.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::debug;

use kopi_core::{Employee, Product};

use crate::error::ApiError;
use crate::state::AppState;

/// Liveness probe response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Reports whether the API and its database are reachable.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    if !state.db.health_check().await {
        return Err(ApiError::internal("Database is unreachable"));
    }
    Ok(Json(HealthResponse { status: "ok" }))
}

/// Lists active products with their variants, for the product grid.
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    debug!("list_products");
    let products = state.db.products().list_active().await?;
    Ok(Json(products))
}

/// Lists active employees, for the cashier picker.
pub async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    debug!("list_employees");
    let employees = state.db.employees().list_active().await?;
    Ok(Json(employees))
}
