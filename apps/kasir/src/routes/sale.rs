//! # Sale Routes
//!
//! Checkout, reprint, and the two small report queries.
//!
//! Checkout delegates to [`CheckoutService`](crate::checkout::CheckoutService);
//! the handler only shapes the request and response. A failed print does not
//! fail the request: the response carries a `printStatus` field instead.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::{debug, info};

use kopi_core::{AnalyticRecord, PaymentMethod};
use kopi_db::ProductPopularity;

use crate::checkout::{CheckoutOutcome, PrintStatus};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for a checkout.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub payment_method: PaymentMethod,

    /// Cashier shown on the receipt. Absent means the default cashier.
    #[serde(default)]
    pub employee_name: Option<String>,
}

/// Query parameters for report endpoints.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default = "default_report_limit")]
    pub limit: i64,
}

fn default_report_limit() -> i64 {
    20
}

/// Finalizes the current cart into a persisted sale.
pub async fn checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutOutcome>, ApiError> {
    let employee = request
        .employee_name
        .filter(|name| !name.trim().is_empty());
    info!(payment_method = ?request.payment_method, "checkout");

    let outcome = state
        .checkout
        .checkout(request.payment_method, employee)
        .await?;
    Ok(Json(outcome))
}

/// Re-sends the last successful checkout's receipt to the printer.
pub async fn reprint(
    State(state): State<AppState>,
) -> Result<Json<PrintStatus>, ApiError> {
    info!("reprint");
    let status = state.checkout.reprint().await?;
    Ok(Json(status))
}

/// Lists the most recent analytic records, newest first.
pub async fn recent_transactions(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<AnalyticRecord>>, ApiError> {
    debug!(limit = %query.limit, "recent_transactions");
    let records = state.db.sales().recent_transactions(query.limit).await?;
    Ok(Json(records))
}

/// Ranks products by total quantity sold.
pub async fn product_popularity(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<ProductPopularity>>, ApiError> {
    debug!(limit = %query.limit, "product_popularity");
    let rows = state.db.sales().product_popularity(query.limit).await?;
    Ok(Json(rows))
}
