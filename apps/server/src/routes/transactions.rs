//! Transaction reads and reversal.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use lylas_core::{OrderLineDetail, TransactionDetail};

use crate::{ApiResult, AppState};

/// Wire shape for a transaction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: i64,
    pub employee_id: i64,
    pub employee_username: String,
    pub schedule_id: Option<i64>,
    pub total_cents: i64,
    pub discounted_total_cents: i64,
    pub cash_received_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl From<TransactionDetail> for TransactionResponse {
    fn from(t: TransactionDetail) -> Self {
        TransactionResponse {
            id: t.id,
            employee_id: t.employee_id,
            employee_username: t.employee_username,
            schedule_id: t.schedule_id,
            total_cents: t.total_cents,
            discounted_total_cents: t.discounted_total_cents,
            cash_received_cents: t.cash_tendered_cents,
            created_at: t.created_at,
        }
    }
}

/// Wire shape for one order line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub id: i64,
    pub stock_batch_id: i64,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub subtotal_cents: i64,
    pub discounted_price_cents: i64,
}

impl From<OrderLineDetail> for OrderLineResponse {
    fn from(l: OrderLineDetail) -> Self {
        OrderLineResponse {
            id: l.id,
            stock_batch_id: l.stock_batch_id,
            product_name: l.product_name,
            unit_price_cents: l.unit_price_cents,
            quantity: l.quantity,
            subtotal_cents: l.subtotal_cents,
            discounted_price_cents: l.discounted_price_cents,
        }
    }
}

/// `GET /api/transactions`
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<TransactionResponse>>> {
    let transactions = state.db.checkout().list().await?;
    Ok(Json(
        transactions.into_iter().map(Into::into).collect(),
    ))
}

/// `GET /api/transactions/{id}`
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TransactionResponse>> {
    let transaction = state.db.checkout().get(id).await?;
    Ok(Json(transaction.into()))
}

/// `GET /api/transactions/{id}/lines`
pub async fn lines(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<OrderLineResponse>>> {
    // 404 for a transaction that never existed, rather than an empty list.
    state.db.checkout().get(id).await?;
    let lines = state.db.checkout().lines(id).await?;
    Ok(Json(lines.into_iter().map(Into::into).collect()))
}

/// `DELETE /api/transactions/{id}`
///
/// Full reversal: restores stock and removes the sale. 404 if the
/// transaction does not exist or was already reversed.
pub async fn reverse(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    state.db.checkout().cancel(id).await?;

    info!(transaction_id = id, "Transaction reversed via API");
    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}
